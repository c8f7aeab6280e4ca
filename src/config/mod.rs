use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the persisted queue state
pub const STATE_FILE_NAME: &str = "lighthouse_agg_state.json";

/// Aggregator configuration, optionally read from a YAML file
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AggregatorConfig {
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

impl AggregatorConfig {
    /// Configuration persisting to an explicit state file
    pub fn with_state_path(state_path: impl Into<PathBuf>) -> Self {
        Self {
            state_path: state_path.into(),
        }
    }

    /// Load configuration from YAML file
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).with_context(|| "Failed to parse YAML config file")
    }
}

/// `<cache dir>/lighthouse-aggregator/lighthouse_agg_state.json`, or `./cache/...` when the
/// platform has no cache directory
pub fn default_state_path() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("lighthouse-aggregator"))
        .unwrap_or_else(|| PathBuf::from("cache"))
        .join(STATE_FILE_NAME)
}
