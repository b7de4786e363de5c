use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use async_trait::async_trait;
use pyannote_rs::{EmbeddingExtractor, EmbeddingManager, get_segments};
use tracing::{info, warn};

use super::DiarizationBackend;
use crate::{DiarizationConfig, Turn};

/// Diarization backend driving the pretrained pyannote ONNX models.
///
/// The embedding extractor is loaded once and shared behind a mutex:
/// inference is a single-threaded, non-batchable unit of work, so
/// concurrent requests queue on the lock. Speaker clustering state is
/// per-request; labels restart at `SPEAKER_00` for every call.
pub struct PyannoteBackend {
    inner: Arc<Mutex<EmbeddingExtractor>>,
    segmentation_model_path: PathBuf,
    max_speakers: usize,
    similarity_threshold: f32,
}

impl PyannoteBackend {
    /// Loads the models from disk, failing fast if either path is missing.
    pub fn new(config: &DiarizationConfig) -> anyhow::Result<Self> {
        if !config.segmentation_model_path.exists() {
            return Err(anyhow!(
                "Segmentation model not found: {:?}",
                config.segmentation_model_path
            ));
        }
        if !config.embedding_model_path.exists() {
            return Err(anyhow!(
                "Embedding model not found: {:?}",
                config.embedding_model_path
            ));
        }

        info!(
            segmentation = %config.segmentation_model_path.display(),
            embedding = %config.embedding_model_path.display(),
            "Loading diarization models"
        );

        // pyannote-rs reports errors through eyre; convert at the boundary
        let extractor = EmbeddingExtractor::new(&config.embedding_model_path)
            .map_err(|e| anyhow!("Failed to load embedding model: {}", e))?;

        Ok(Self {
            inner: Arc::new(Mutex::new(extractor)),
            segmentation_model_path: config.segmentation_model_path.clone(),
            max_speakers: config.max_speakers,
            similarity_threshold: config.similarity_threshold,
        })
    }

    fn diarize_blocking(
        extractor: &mut EmbeddingExtractor,
        segmentation_model_path: &Path,
        max_speakers: usize,
        similarity_threshold: f32,
        samples: &[i16],
        sample_rate: u32,
    ) -> anyhow::Result<Vec<Turn>> {
        let segments = get_segments(samples, sample_rate, segmentation_model_path)
            .map_err(|e| anyhow!("Segmentation failed: {}", e))?;

        let mut manager = EmbeddingManager::new(max_speakers);
        let mut turns = Vec::new();

        for segment in segments {
            let segment = match segment {
                Ok(seg) => seg,
                Err(e) => {
                    warn!("Skipping unreadable segment: {}", e);
                    continue;
                }
            };

            let embedding: Vec<f32> = match extractor.compute(&segment.samples) {
                Ok(iter) => iter.collect(),
                Err(e) => {
                    warn!(
                        start = segment.start,
                        end = segment.end,
                        "Skipping segment without embedding: {}",
                        e
                    );
                    continue;
                }
            };

            let speaker = match manager.search_speaker(embedding, similarity_threshold) {
                Some(idx) => format!("SPEAKER_{:02}", idx),
                // Speaker cap reached and nothing similar enough
                None => format!("SPEAKER_{:02}", max_speakers),
            };

            turns.push(Turn::new(segment.start, segment.end, speaker));
        }

        Ok(turns)
    }
}

#[async_trait]
impl DiarizationBackend for PyannoteBackend {
    async fn diarize(&self, audio_path: &Path) -> anyhow::Result<Vec<Turn>> {
        let audio_path = audio_path.to_path_buf();
        let inner = Arc::clone(&self.inner);
        let segmentation_model_path = self.segmentation_model_path.clone();
        let max_speakers = self.max_speakers;
        let similarity_threshold = self.similarity_threshold;

        // WAV decode and ONNX inference are CPU-bound; keep them off the
        // async runtime
        tokio::task::spawn_blocking(move || {
            let (samples, sample_rate) = read_wav(&audio_path)?;
            let mut extractor = inner
                .lock()
                .map_err(|_| anyhow!("Diarization model state poisoned"))?;
            Self::diarize_blocking(
                &mut extractor,
                &segmentation_model_path,
                max_speakers,
                similarity_threshold,
                &samples,
                sample_rate,
            )
        })
        .await?
    }

    fn name(&self) -> &str {
        "pyannote"
    }
}

/// Reads a WAV file into i16 samples, accepting both int and float encodings.
fn read_wav(path: &Path) -> anyhow::Result<(Vec<i16>, u32)> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| anyhow!("Failed to open WAV file {:?}: {}", path, e))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i16>()
            .collect::<Result<_, _>>()
            .map_err(|e| anyhow!("Failed to decode WAV samples: {}", e))?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|v| (v * 32767.0).clamp(-32768.0, 32767.0) as i16))
            .collect::<Result<_, _>>()
            .map_err(|e| anyhow!("Failed to decode WAV samples: {}", e))?,
    };

    Ok((samples, spec.sample_rate))
}
