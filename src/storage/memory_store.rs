use super::{PersistenceGateway, Result, StorageError};
use crate::memory::Snapshot;

/// Keeps the last saved snapshot in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    snapshot: Option<Snapshot>,
    saves: usize,
    fail_saves: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing snapshot, as if loaded from disk
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Default::default()
        }
    }

    /// Make every subsequent save fail
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl PersistenceGateway for InMemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_saves {
            return Err(StorageError::Rejected("in-memory store set to fail".to_string()));
        }
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}
