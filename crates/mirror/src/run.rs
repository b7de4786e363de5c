use tempfile::TempDir;
use tracing::{info, warn};

use voxsplit_config::MirrorConfig;

use crate::error::MirrorError;
use crate::github::{GithubClient, RemoteFile, RepoRef};
use crate::store::ObjectStore;

/// Tally of one mirror run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSummary {
    /// Files matching the suffix filter.
    pub found: usize,
    pub uploaded: usize,
    pub failed: usize,
}

/// Mirrors all matching files from the configured repository into the store.
///
/// Strictly sequential: list, then download+upload one file at a time.
/// A listing failure aborts the run; per-file failures are logged, counted,
/// and do not stop later files.
pub async fn mirror_repository(
    config: &MirrorConfig,
    github: &GithubClient,
    store: &dyn ObjectStore,
) -> Result<MirrorSummary, MirrorError> {
    if config.repo_url.is_empty() {
        return Err(MirrorError::NotConfigured("mirror.repo_url is empty"));
    }

    let repo = RepoRef::parse(&config.repo_url, &config.branch)?;
    info!(
        owner = %repo.owner,
        repo = %repo.repo,
        branch = %repo.branch,
        path = %repo.path,
        "Fetching file list"
    );

    let files = github.list_files(&repo).await?;
    let matching: Vec<RemoteFile> = files
        .into_iter()
        .filter(|f| f.name.ends_with(&config.suffix))
        .collect();
    info!(
        suffix = %config.suffix,
        matching = matching.len(),
        "File list fetched"
    );

    if matching.is_empty() {
        info!("No matching files in the repository");
        return Ok(MirrorSummary {
            found: 0,
            uploaded: 0,
            failed: 0,
        });
    }

    let staging = tempfile::tempdir()?;
    let mut uploaded = 0;

    for file in &matching {
        info!(path = %file.path, "Mirroring");
        match transfer(github, store, &staging, file).await {
            Ok(()) => uploaded += 1,
            Err(e) => warn!(path = %file.path, "Transfer failed: {e:#}"),
        }
    }

    let summary = MirrorSummary {
        found: matching.len(),
        uploaded,
        failed: matching.len() - uploaded,
    };
    info!(
        found = summary.found,
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Mirror run complete"
    );

    Ok(summary)
}

async fn transfer(
    github: &GithubClient,
    store: &dyn ObjectStore,
    staging: &TempDir,
    file: &RemoteFile,
) -> anyhow::Result<()> {
    let local_path = staging.path().join(&file.path);
    github.download(&file.download_url, &local_path).await?;
    // Key = repo-relative path, so the bucket mirrors the tree layout
    store.put_file(&file.path, &local_path).await?;
    Ok(())
}
