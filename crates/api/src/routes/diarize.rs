use std::path::Path;

use axum::{Json, body::Bytes, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{error::ApiError, state::AppState};
use voxsplit_diarization::DiarizationReport;

#[derive(Debug, Deserialize)]
pub struct DiarizeFromPathRequest {
    pub audio_path: Option<String>,
}

/// Reduced response for the speaker-count endpoint.
#[derive(Debug, Serialize)]
pub struct SpeakerCountResponse {
    pub success: bool,
    pub total_speakers: usize,
    pub total_duration: f64,
    pub speakers_found: Vec<String>,
}

impl From<DiarizationReport> for SpeakerCountResponse {
    fn from(report: DiarizationReport) -> Self {
        Self {
            success: report.success,
            total_speakers: report.total_speakers,
            total_duration: report.total_duration,
            speakers_found: report.speakers_found,
        }
    }
}

/// `POST /api/diarize` — raw audio upload, full report.
pub async fn upload(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<DiarizationReport>, ApiError> {
    let report = diarize_upload(&state, body).await?;
    Ok(Json(report))
}

/// `POST /api/diarize/path` — diarize a server-local file.
///
/// Useful for batch processing when the file already lives on the server.
pub async fn from_path(
    State(state): State<AppState>,
    Json(body): Json<DiarizeFromPathRequest>,
) -> Json<DiarizationReport> {
    let Some(audio_path) = body.audio_path.filter(|p| Path::new(p).exists()) else {
        return Json(DiarizationReport::failure(
            "Invalid or missing audio_path in request",
        ));
    };

    info!(%audio_path, "Diarizing server-local file");
    let outcome = state.backend.diarize(Path::new(&audio_path)).await;
    Json(DiarizationReport::from_outcome(outcome))
}

/// `POST /api/diarize/speakers` — raw audio upload, speaker count only.
pub async fn speaker_count(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SpeakerCountResponse>, ApiError> {
    let report = diarize_upload(&state, body).await?;
    Ok(Json(report.into()))
}

/// Stages the uploaded bytes in a temp file, runs the backend, and shapes
/// the outcome. The temp file is exclusively owned by this request and is
/// removed when the guard drops, on success and failure alike.
async fn diarize_upload(state: &AppState, body: Bytes) -> Result<DiarizationReport, ApiError> {
    let tmp = tempfile::Builder::new()
        .prefix("voxsplit-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| ApiError::Internal(format!("Failed to create temp file: {e}")))?;

    tokio::fs::write(tmp.path(), &body)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to stage upload: {e}")))?;

    info!(bytes = body.len(), "Diarizing uploaded audio");
    let outcome = state.backend.diarize(tmp.path()).await;
    if let Err(e) = &outcome {
        warn!("Diarization failed: {e:#}");
    }

    Ok(DiarizationReport::from_outcome(outcome))
}
