//! Snapshot persistence
//!
//! The engine saves the whole catalog and progress as one [`Snapshot`]
//! after every mutation and loads it once at startup.

mod json_store;
mod memory_store;

use thiserror::Error;

use crate::memory::Snapshot;

pub use json_store::{JsonFileStore, DEFAULT_SNAPSHOT_FILE};
pub use memory_store::InMemoryStore;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Save rejected: {0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Whole-snapshot load/save
pub trait PersistenceGateway: Send {
    /// The last saved snapshot, or `None` if nothing was ever saved
    fn load(&self) -> Result<Option<Snapshot>>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}
