//! Configuration for the suggestion store

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the suggestion store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory for suggestion files
    pub data_dir: PathBuf,

    /// Suggestions older than this many days are removed by cleanup
    pub retention_days: u32,

    /// Write indented JSON
    pub pretty: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("./data/suggestions"), retention_days: 7, pretty: true }
    }
}

impl StoreConfig {
    /// Create a new configuration with custom data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Default::default() }
    }

    /// Path of a team's suggestion file
    pub fn team_file(&self, team_id: u32) -> PathBuf {
        self.data_dir.join(format!("team_{team_id}.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.data_dir.as_os_str().is_empty() {
            return Err("data_dir must not be empty".to_string());
        }

        if self.retention_days == 0 {
            return Err("retention_days must be greater than 0".to_string());
        }

        Ok(())
    }
}
