//! Queue persistence to JSON files

use crate::config::AggregatorConfig;
use crate::job::AggregatorJob;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Failed to read state file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("State file {} is not a JSON array of cid/txID records: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to write state file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize queue state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Handles queue persistence to disk
///
/// The file holds a JSON array of `{"cid", "txID"}` objects. Saves go through a sibling
/// `.tmp` file that is renamed over the target, so a crash mid-write leaves the previous
/// state intact. Only one writer may use a given path at a time.
///
/// The rename replaces the target itself: a symlinked state file becomes a regular file, and
/// the new file gets default permissions rather than the old file's.
#[derive(Debug, Clone)]
pub struct StateStorage {
    file_path: PathBuf,
}

impl StateStorage {
    /// Create a new storage handler
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Storage at the configured state path
    pub fn from_config(config: &AggregatorConfig) -> Self {
        Self::new(&config.state_path)
    }

    /// Create the directory holding the state file
    pub async fn init(&self) -> Result<(), StateError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|source| StateError::Write {
                        path: parent.to_path_buf(),
                        source,
                    })?;
            }
        }
        Ok(())
    }

    /// Write the jobs to the state file, replacing any previous content
    pub async fn save(&self, jobs: &[AggregatorJob]) -> Result<(), StateError> {
        debug!("Saving queue state to: {}", self.file_path.display());

        let json = serde_json::to_string(jobs)?;
        let temp_path = self.temp_path();

        if let Err(source) = write_synced(&temp_path, json.as_bytes()).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StateError::Write {
                path: self.file_path.clone(),
                source,
            });
        }

        if let Err(source) = fs::rename(&temp_path, &self.file_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StateError::Write {
                path: self.file_path.clone(),
                source,
            });
        }

        info!(
            "Saved {} jobs to queue state file: {}",
            jobs.len(),
            self.file_path.display()
        );
        Ok(())
    }

    /// Read the jobs from the state file. A missing file yields an empty list.
    pub async fn load(&self) -> Result<Vec<AggregatorJob>, StateError> {
        let contents = match fs::read_to_string(&self.file_path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "Queue state file not found, starting empty: {}",
                    self.file_path.display()
                );
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: self.file_path.clone(),
                    source,
                })
            }
        };

        let jobs: Vec<AggregatorJob> =
            serde_json::from_str(&contents).map_err(|source| StateError::Parse {
                path: self.file_path.clone(),
                source,
            })?;

        info!(
            "Loaded {} jobs from queue state file: {}",
            jobs.len(),
            self.file_path.display()
        );
        Ok(jobs)
    }

    /// Check if storage file exists
    pub fn exists(&self) -> bool {
        self.file_path.exists()
    }

    /// Delete the storage file
    pub async fn delete(&self) -> Result<(), StateError> {
        match fs::remove_file(&self.file_path).await {
            Ok(()) => {
                info!("Deleted queue state file: {}", self.file_path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StateError::Write {
                path: self.file_path.clone(),
                source,
            }),
        }
    }

    /// Get the storage file path
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }
}

async fn write_synced(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}
