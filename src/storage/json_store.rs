//! Single-file JSON snapshot storage
//!
//! Layout:
//! ```text
//! {data_dir}/
//! └── memory.json   # { "verses": [...], "progress": {...} }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::{PersistenceGateway, Result};
use crate::memory::Snapshot;

pub const DEFAULT_SNAPSHOT_FILE: &str = "memory.json";

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store `memory.json` inside `data_dir`
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(DEFAULT_SNAPSHOT_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl PersistenceGateway for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        log::info!(
            "Loaded {} verses from {:?}",
            snapshot.verses.len(),
            self.path
        );
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write then rename so a crash mid-write leaves the previous snapshot intact
        let temp = self.temp_path();
        fs::write(&temp, serde_json::to_string_pretty(snapshot)?)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
