use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
///
/// Layered: built-in defaults, then an optional TOML file (path taken from
/// `VOXSPLIT_CONFIG`, falling back to `config/voxsplit.toml`), then
/// environment variables with the `VOXSPLIT` prefix and `__` separator
/// (e.g. `VOXSPLIT__SERVER__PORT=8080`, `VOXSPLIT__S3__ACCESS_KEY=...`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub diarization: DiarizationSettings,
    #[serde(default)]
    pub mirror: MirrorConfig,
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Model locations and clustering knobs for the diarization backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationSettings {
    /// Path to the segmentation ONNX model (segmentation-3.0.onnx).
    pub segmentation_model_path: String,
    /// Path to the speaker embedding ONNX model.
    pub embedding_model_path: String,
    /// Maximum number of distinct speakers to track per request.
    pub max_speakers: usize,
    /// Cosine-similarity threshold for assigning a segment to an existing speaker.
    pub similarity_threshold: f32,
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            segmentation_model_path: "models/segmentation-3.0.onnx".to_string(),
            embedding_model_path: "models/wespeaker_en_voxceleb_CAM++.onnx".to_string(),
            max_speakers: 10,
            similarity_threshold: 0.5,
        }
    }
}

/// What to mirror and where to find it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Repository URL, optionally with `/tree/{branch}/{subdir}`.
    pub repo_url: String,
    /// Branch to mirror. `main` is the hosting API's default and produces
    /// no `ref` query parameter.
    pub branch: String,
    /// Only files whose name ends with this suffix are transferred.
    pub suffix: String,
    /// Contents-API base URL. Overridable for tests.
    pub api_base: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            repo_url: String::new(),
            branch: "main".to_string(),
            suffix: ".bento".to_string(),
            api_base: "https://api.github.com".to_string(),
        }
    }
}

/// Object-storage target. Credentials come from the environment or a
/// dotenv file, never from literals in this tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint for S3-compatible stores (MinIO etc.). None = AWS.
    pub endpoint_url: Option<String>,
    pub access_key: String,
    pub secret_access_key: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl AppConfig {
    /// Loads configuration from file and environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("VOXSPLIT_CONFIG").unwrap_or_else(|_| "config/voxsplit.toml".to_string());

        let mut builder = config::Config::builder();

        let path = Path::new(&config_path);
        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        }

        let built = builder
            .add_source(config::Environment::with_prefix("VOXSPLIT").separator("__"))
            .build()?;

        // Sections not present in any source fall back to serde defaults.
        built.try_deserialize()
    }
}
