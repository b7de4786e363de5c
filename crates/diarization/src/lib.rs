pub mod backend;
pub mod config;
pub mod report;

pub use backend::DiarizationBackend;
#[cfg(feature = "local-pyannote")]
pub use backend::pyannote::PyannoteBackend;
pub use config::DiarizationConfig;
pub use report::{DiarizationReport, Segment, SpeakerStats};

use serde::{Deserialize, Serialize};

/// A single attributed time interval as emitted by the diarization pipeline.
///
/// Turns arrive in pipeline emission order, which is not guaranteed to be
/// chronological.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Seconds from the start of the audio.
    pub start_time: f64,
    /// Seconds from the start of the audio. Always > `start_time`.
    pub end_time: f64,
    /// Speaker label, e.g. `SPEAKER_00`.
    pub speaker: String,
}

impl Turn {
    pub fn new(start_time: f64, end_time: f64, speaker: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            speaker: speaker.into(),
        }
    }
}
