use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use voxsplit_api::{build_router, state::AppState};
use voxsplit_config::AppConfig;
use voxsplit_diarization::{DiarizationConfig, PyannoteBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;

    let backend = PyannoteBackend::new(&DiarizationConfig {
        segmentation_model_path: config.diarization.segmentation_model_path.clone().into(),
        embedding_model_path: config.diarization.embedding_model_path.clone().into(),
        max_speakers: config.diarization.max_speakers,
        similarity_threshold: config.diarization.similarity_threshold,
    })?;

    let state = AppState::new(Arc::new(backend));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, backend = "pyannote", "Diarization API listening");

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
