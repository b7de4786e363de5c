use std::path::Path;

use futures::StreamExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::MirrorError;

/// The hosting API rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("voxsplit-mirror/", env!("CARGO_PKG_VERSION"));

/// A parsed repository locator: owner, repo, branch, and subdirectory path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Repo-relative subdirectory to mirror; empty = repository root.
    pub path: String,
}

impl RepoRef {
    /// Parses `https://github.com/{owner}/{repo}` with an optional
    /// `/tree/{branch}/{subdir…}` tail. A `tree` component overrides
    /// `default_branch`.
    pub fn parse(url: &str, default_branch: &str) -> Result<Self, MirrorError> {
        let rest = url
            .strip_prefix("https://github.com/")
            .ok_or_else(|| MirrorError::InvalidRepoUrl(url.to_string()))?;

        let parts: Vec<&str> = rest.split('/').filter(|p| !p.is_empty()).collect();
        let [owner, repo, tail @ ..] = parts.as_slice() else {
            return Err(MirrorError::InvalidRepoUrl(url.to_string()));
        };

        let (branch, path) = match tail {
            ["tree", branch, path @ ..] => (branch.to_string(), path.join("/")),
            [] => (default_branch.to_string(), String::new()),
            _ => return Err(MirrorError::InvalidRepoUrl(url.to_string())),
        };

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch,
            path,
        })
    }
}

/// A file discovered in the remote tree.
#[derive(Debug, Clone)]
pub struct RemoteFile {
    pub name: String,
    /// Repo-relative path; doubles as the object-storage key.
    pub path: String,
    pub download_url: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
    url: String,
}

/// Thin client for the contents API. The base URL is injectable so tests
/// can point it at a local server.
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
        }
    }

    /// Enumerates every file reachable under `repo.path`.
    ///
    /// Directories are walked with an explicit worklist; the tree listing
    /// is acyclic by construction, so no visited set is needed. Any
    /// listing failure is fatal for the whole run.
    pub async fn list_files(&self, repo: &RepoRef) -> Result<Vec<RemoteFile>, MirrorError> {
        let root = with_branch_ref(
            format!(
                "{}/repos/{}/{}/contents/{}",
                self.api_base, repo.owner, repo.repo, repo.path
            ),
            &repo.branch,
        );

        let mut files = Vec::new();
        let mut pending = vec![root];

        while let Some(url) = pending.pop() {
            debug!(%url, "Listing directory");
            let entries: Vec<ContentEntry> = self
                .http
                .get(&url)
                .header(reqwest::header::USER_AGENT, USER_AGENT)
                .send()
                .await
                .map_err(MirrorError::Listing)?
                .error_for_status()
                .map_err(MirrorError::Listing)?
                .json()
                .await
                .map_err(MirrorError::Listing)?;

            for entry in entries {
                match entry.kind.as_str() {
                    "file" => match entry.download_url {
                        Some(download_url) => files.push(RemoteFile {
                            name: entry.name,
                            path: entry.path,
                            download_url,
                        }),
                        None => warn!(path = %entry.path, "File entry without download URL"),
                    },
                    "dir" => pending.push(with_branch_ref(entry.url, &repo.branch)),
                    other => debug!(path = %entry.path, kind = other, "Skipping entry"),
                }
            }
        }

        Ok(files)
    }

    /// Downloads `url` to `dest`, creating parent directories as needed.
    pub async fn download(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        let response = self
            .http
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            tokio::io::AsyncWriteExt::write_all(&mut file, &chunk?).await?;
        }
        tokio::io::AsyncWriteExt::flush(&mut file).await?;

        Ok(())
    }
}

/// Appends `?ref={branch}` for non-default branches. An explicit `main`
/// behaves identically to no branch at all; the upstream API defaults to
/// `main`, and we keep that quirk rather than always sending the ref.
fn with_branch_ref(url: String, branch: &str) -> String {
    if branch == "main" {
        url
    } else {
        format!("{url}?ref={branch}")
    }
}
