pub mod error;
pub mod github;
pub mod run;
pub mod store;

pub use error::MirrorError;
pub use github::{GithubClient, RemoteFile, RepoRef};
pub use run::{MirrorSummary, mirror_repository};
pub use store::{ObjectStore, S3Store};
