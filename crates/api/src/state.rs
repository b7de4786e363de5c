use std::sync::Arc;

use voxsplit_diarization::DiarizationBackend;

/// Shared application state.
///
/// The backend is loaded once at startup and read-only afterwards; requests
/// share it through the `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn DiarizationBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn DiarizationBackend>) -> Self {
        Self { backend }
    }
}
