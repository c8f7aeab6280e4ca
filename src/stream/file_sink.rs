use super::{ByteSink, StreamError};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes streamed chunks to a file on disk
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    bytes_written: u64,
}

impl FileSink {
    /// Create (or truncate) the destination file
    pub async fn create(path: impl AsRef<Path>) -> Result<Self, StreamError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).await?;
        Ok(Self {
            path,
            file: Some(file),
            bytes_written: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn is_finished(&self) -> bool {
        self.file.is_none()
    }
}

#[async_trait]
impl ByteSink for FileSink {
    async fn write_chunk(&mut self, chunk: Bytes) -> Result<(), StreamError> {
        match self.file.as_mut() {
            Some(file) => file.write_all(&chunk).await?,
            None => {
                return Err(StreamError::Sink(format!(
                    "{} is already finished",
                    self.path.display()
                )))
            }
        }
        self.bytes_written += chunk.len() as u64;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), StreamError> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
            debug!(
                "Finished writing {} bytes to {}",
                self.bytes_written,
                self.path.display()
            );
        }
        Ok(())
    }
}
