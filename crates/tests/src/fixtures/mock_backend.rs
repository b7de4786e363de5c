use std::path::Path;

use async_trait::async_trait;

use voxsplit_diarization::{DiarizationBackend, Turn};

enum MockOutcome {
    Turns(Vec<Turn>),
    Error(String),
}

/// Scripted backend: always answers with the configured turns or error.
pub struct MockBackend {
    outcome: MockOutcome,
}

impl MockBackend {
    pub fn with_turns(turns: Vec<Turn>) -> Self {
        Self {
            outcome: MockOutcome::Turns(turns),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Error(message.into()),
        }
    }
}

#[async_trait]
impl DiarizationBackend for MockBackend {
    async fn diarize(&self, _audio_path: &Path) -> anyhow::Result<Vec<Turn>> {
        match &self.outcome {
            MockOutcome::Turns(turns) => Ok(turns.clone()),
            MockOutcome::Error(message) => Err(anyhow::anyhow!("{message}")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
