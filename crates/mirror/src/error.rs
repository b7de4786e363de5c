use thiserror::Error;

/// Fatal mirror errors.
///
/// Only failures that abort a whole run live here; per-file transfer
/// failures are logged and counted by the run loop instead.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("Failed to list repository contents: {0}")]
    Listing(#[source] reqwest::Error),

    #[error("Mirror is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
