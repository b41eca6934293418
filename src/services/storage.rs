use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncWriteExt};
use uuid::Uuid;

/// Prefix of in-flight uploads; never a valid key since keys cannot start with `.`
pub const STAGING_PREFIX: &str = ".staging-";

#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub key: String,
    pub size: u64,
}

#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn ensure_ready(&self) -> Result<()>;
    /// Writes the stream under `key`, replacing any previous content.
    /// The previous content survives if the stream fails.
    async fn save_stream<'a>(
        &self,
        key: &str,
        reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredUpload>;
    async fn exists(&self, key: &str) -> Result<bool>;
    async fn read(&self, key: &str) -> Result<Vec<u8>>;
    async fn is_available(&self) -> bool;
    fn resolve(&self, key: &str) -> PathBuf;
}

/// Flat directory of uploads on the local filesystem
pub struct LocalUploadStore {
    root: PathBuf,
}

impl LocalUploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn ensure_ready(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create upload folder {}", self.root.display()))
    }

    async fn save_stream<'a>(
        &self,
        key: &str,
        mut reader: Box<dyn AsyncRead + Unpin + Send + 'a>,
    ) -> Result<StoredUpload> {
        let path = self.resolve(key);
        let staging = self.resolve(&format!("{}{}.tmp", STAGING_PREFIX, Uuid::new_v4()));

        let written: Result<u64> = async {
            let mut file = tokio::fs::File::create(&staging)
                .await
                .with_context(|| format!("Failed to open {} for writing", staging.display()))?;
            let size = tokio::io::copy(&mut reader, &mut file).await?;
            file.flush().await?;
            Ok(size)
        }
        .await;

        let size = match written {
            Ok(size) => size,
            Err(e) => {
                let _ = tokio::fs::remove_file(&staging).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(anyhow::anyhow!(e).context(format!("Failed to replace {}", path.display())));
        }

        Ok(StoredUpload {
            key: key.to_string(),
            size,
        })
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.resolve(key);
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(anyhow::anyhow!(e).context(format!("Failed to stat {}", path.display()))),
        }
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    async fn is_available(&self) -> bool {
        tokio::fs::metadata(&self.root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}
