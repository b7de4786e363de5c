#[cfg(feature = "local-pyannote")]
pub mod pyannote;

use std::path::Path;

use async_trait::async_trait;

use crate::Turn;

/// Trait for pluggable diarization backends.
///
/// A backend owns a loaded pipeline and turns an audio file into raw
/// speaker turns. Result shaping happens downstream in [`crate::report`].
#[async_trait]
pub trait DiarizationBackend: Send + Sync + 'static {
    /// Runs diarization on the audio file at `audio_path`.
    ///
    /// Each call is a single non-batchable unit of work; implementations
    /// may serialize calls internally.
    async fn diarize(&self, audio_path: &Path) -> anyhow::Result<Vec<Turn>>;

    /// Human-readable backend name.
    fn name(&self) -> &str;
}
