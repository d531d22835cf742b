//! Engine configuration, read from TOML
//!
//! ```toml
//! data_dir = "/home/me/.local/share/hidden-word"
//! snapshot_file = "memory.json"
//! utc_offset_minutes = -300
//! seed_on_first_run = true
//! recent_sessions_limit = 10
//! ```
//!
//! Every key is optional.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::storage::{JsonFileStore, DEFAULT_SNAPSHOT_FILE};
use crate::time::{Calendar, FixedOffsetCalendar, LocalCalendar};

const APP_DIR_NAME: &str = "hidden-word";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid UTC offset: {0} minutes")]
    InvalidOffset(i32),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Where the snapshot lives; defaults to the platform data dir
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Fixed offset for streak days; the host's local zone when unset
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
    /// Install the starter verses when no snapshot exists yet
    #[serde(default = "default_seed_on_first_run")]
    pub seed_on_first_run: bool,
    #[serde(default = "default_recent_sessions_limit")]
    pub recent_sessions_limit: usize,
}

fn default_snapshot_file() -> String {
    DEFAULT_SNAPSHOT_FILE.to_string()
}

fn default_seed_on_first_run() -> bool {
    true
}

fn default_recent_sessions_limit() -> usize {
    10
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            snapshot_file: default_snapshot_file(),
            utc_offset_minutes: None,
            seed_on_first_run: default_seed_on_first_run(),
            recent_sessions_limit: default_recent_sessions_limit(),
        }
    }
}

impl EngineConfig {
    /// Read a config file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(minutes) = self.utc_offset_minutes {
            if FixedOffsetCalendar::from_minutes(minutes).is_none() {
                return Err(ConfigError::InvalidOffset(minutes));
            }
        }
        Ok(())
    }

    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join(APP_DIR_NAME))
                .ok_or(ConfigError::DataDirNotFound),
        }
    }

    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.resolve_data_dir()?.join(&self.snapshot_file))
    }

    pub fn store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::new(self.snapshot_path()?))
    }

    pub fn calendar(&self) -> Result<Arc<dyn Calendar>> {
        match self.utc_offset_minutes {
            Some(minutes) => FixedOffsetCalendar::from_minutes(minutes)
                .map(|c| Arc::new(c) as Arc<dyn Calendar>)
                .ok_or(ConfigError::InvalidOffset(minutes)),
            None => Ok(Arc::new(LocalCalendar)),
        }
    }
}
