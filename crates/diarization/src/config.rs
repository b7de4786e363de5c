use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the diarization backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationConfig {
    /// Path to the segmentation model (segmentation-3.0.onnx).
    pub segmentation_model_path: PathBuf,
    /// Path to the speaker embedding model (wespeaker_en_voxceleb_CAM++.onnx).
    pub embedding_model_path: PathBuf,
    /// Maximum number of distinct speakers to track per request.
    pub max_speakers: usize,
    /// Cosine-similarity threshold for matching a segment to a known speaker (0.0-1.0).
    pub similarity_threshold: f32,
}

impl Default for DiarizationConfig {
    fn default() -> Self {
        Self {
            segmentation_model_path: PathBuf::new(),
            embedding_model_path: PathBuf::new(),
            max_speakers: 10,
            similarity_threshold: 0.5,
        }
    }
}
