use std::path::Path;

use anyhow::anyhow;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use tracing::info;

use voxsplit_config::S3Config;

/// Upload seam between the run loop and the storage backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads the file at `path` under `key`.
    async fn put_file(&self, key: &str, path: &Path) -> anyhow::Result<()>;
}

/// S3-compatible object store.
///
/// A custom `endpoint_url` switches on path-style addressing, which MinIO
/// and similar stores expect.
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub async fn connect(config: &S3Config) -> anyhow::Result<Self> {
        if config.bucket.is_empty() {
            return Err(anyhow!("S3 bucket is not configured"));
        }

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_access_key,
            None,
            None,
            "voxsplit-mirror",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(config.endpoint_url.is_some())
            .build();

        info!(
            bucket = %config.bucket,
            endpoint = config.endpoint_url.as_deref().unwrap_or("aws"),
            "Connected to object store"
        );

        Ok(Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_file(&self, key: &str, path: &Path) -> anyhow::Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| anyhow!("Failed to read staged file {:?}: {}", path, e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| anyhow!("Upload of {} failed: {}", key, e))?;

        Ok(())
    }
}
