use tracing::info;
use tracing_subscriber::EnvFilter;

use voxsplit_config::AppConfig;
use voxsplit_mirror::{GithubClient, S3Store, mirror_repository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let store = S3Store::connect(&config.s3).await?;
    let github = GithubClient::new(config.mirror.api_base.clone());

    let summary = mirror_repository(&config.mirror, &github, &store).await?;
    info!(
        found = summary.found,
        uploaded = summary.uploaded,
        failed = summary.failed,
        "Done"
    );

    Ok(())
}
