//! The engine a host application holds for one user
//!
//! Owns the catalog and progress, runs each operation through the scheduler,
//! and saves a snapshot after every mutation. A failed save is logged and
//! remembered but never undoes or aborts the in-memory change.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use super::catalog::VerseCatalog;
use super::error::{MemoryError, Result};
use super::models::{MemoryProgress, MemoryVerse, ProgressSummary, ReviewSession, Snapshot};
use super::progress::ProgressTracker;
use super::scheduler::{ReviewOutcome, ReviewScheduler};
use super::seed::seed_verses;
use crate::config::{ConfigError, EngineConfig};
use crate::storage::{JsonFileStore, PersistenceGateway, StorageError};
use crate::time::{Calendar, Clock};

const DEFAULT_RECENT_SESSIONS: usize = 10;

#[derive(Error, Debug)]
pub enum OpenError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Reviews tallied while a practice session is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTally {
    pub started_at: DateTime<Utc>,
    pub verses_reviewed: u32,
    pub correct_answers: u32,
}

pub struct MemoryEngine<G: PersistenceGateway> {
    catalog: VerseCatalog,
    tracker: ProgressTracker,
    scheduler: ReviewScheduler,
    gateway: G,
    clock: Arc<dyn Clock>,
    session: Option<SessionTally>,
    recent_sessions_limit: usize,
    last_save_error: Option<String>,
}

impl MemoryEngine<JsonFileStore> {
    /// Open the JSON snapshot described by `config`
    pub fn open_with_config(
        config: &EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, OpenError> {
        let store = config.store()?;
        let calendar = config.calendar()?;
        let mut engine = Self::open_with(store, clock, calendar, config.seed_on_first_run)?;
        engine.recent_sessions_limit = config.recent_sessions_limit;
        Ok(engine)
    }
}

impl<G: PersistenceGateway> MemoryEngine<G> {
    /// Load the saved snapshot, seeding the starter verses if there is none
    pub fn open(
        gateway: G,
        clock: Arc<dyn Clock>,
        calendar: Arc<dyn Calendar>,
    ) -> std::result::Result<Self, StorageError> {
        Self::open_with(gateway, clock, calendar, true)
    }

    pub fn open_with(
        gateway: G,
        clock: Arc<dyn Clock>,
        calendar: Arc<dyn Calendar>,
        seed_on_first_run: bool,
    ) -> std::result::Result<Self, StorageError> {
        let loaded = gateway.load().map_err(|e| {
            log::warn!("Saved snapshot could not be loaded: {}", e);
            e
        })?;
        let (snapshot, fresh) = match loaded {
            Some(snapshot) => (snapshot, false),
            None if seed_on_first_run => {
                let verses = seed_verses(clock.now());
                log::info!("No saved snapshot, installing {} starter verses", verses.len());
                let progress = MemoryProgress {
                    total_verses: verses.len() as u32,
                    ..Default::default()
                };
                (Snapshot { verses, progress }, true)
            }
            None => (Snapshot::default(), true),
        };

        let mut catalog = VerseCatalog::from_verses(snapshot.verses);
        let stamped = catalog.backfill_mastered_at();
        if stamped > 0 {
            log::info!("Marked {} already-mastered verses as counted", stamped);
        }

        let mut engine = Self {
            catalog,
            tracker: ProgressTracker::new(snapshot.progress, calendar),
            scheduler: ReviewScheduler::new(),
            gateway,
            clock,
            session: None,
            recent_sessions_limit: DEFAULT_RECENT_SESSIONS,
            last_save_error: None,
        };
        if fresh && !engine.catalog.is_empty() {
            engine.persist();
        }
        Ok(engine)
    }

    // ===== Accessors =====

    pub fn catalog(&self) -> &VerseCatalog {
        &self.catalog
    }

    pub fn progress(&self) -> &MemoryProgress {
        self.tracker.progress()
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Error from the most recent save, cleared by the next successful one
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            verses: self.catalog.verses().to_vec(),
            progress: self.tracker.progress().clone(),
        }
    }

    // ===== Catalog operations =====

    pub fn add_verse(&mut self, verse: MemoryVerse) -> Uuid {
        let id = self.catalog.add(verse, self.clock.now());
        self.tracker.verse_added();
        self.persist();
        id
    }

    pub fn remove_verse(&mut self, id: Uuid) -> Result<MemoryVerse> {
        let removed = self.catalog.remove(id)?;
        self.tracker.verse_removed();
        self.persist();
        Ok(removed)
    }

    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<bool> {
        let favorite = self.catalog.toggle_favorite(id)?;
        self.persist();
        Ok(favorite)
    }

    pub fn update_notes(&mut self, id: Uuid, notes: impl Into<String>) -> Result<()> {
        self.catalog.update_notes(id, notes)?;
        self.persist();
        Ok(())
    }

    // ===== Reviews =====

    /// Grade one recall attempt at the clock's current time
    pub fn record_review(&mut self, id: Uuid, correct: bool) -> Result<ReviewOutcome> {
        let now = self.clock.now();
        let outcome =
            self.scheduler
                .record_review(&mut self.catalog, &mut self.tracker, id, correct, now)?;

        if let Some(tally) = self.session.as_mut() {
            tally.verses_reviewed += 1;
            if correct {
                tally.correct_answers += 1;
            }
        }

        self.persist();
        Ok(outcome)
    }

    pub fn due_verses(&self) -> Vec<&MemoryVerse> {
        self.scheduler.due_verses(&self.catalog, self.clock.now())
    }

    pub fn due_verses_at(&self, as_of: DateTime<Utc>) -> Vec<&MemoryVerse> {
        self.scheduler.due_verses(&self.catalog, as_of)
    }

    /// Record a session with caller-supplied totals
    pub fn complete_session(
        &mut self,
        verses_reviewed: u32,
        correct_answers: u32,
        duration_secs: u64,
    ) -> ReviewSession {
        let now = self.clock.now();
        let session = self
            .scheduler
            .complete_session(&mut self.tracker, verses_reviewed, correct_answers, duration_secs, now)
            .clone();
        self.persist();
        session
    }

    // ===== Practice sessions =====

    /// Start tallying reviews; `finish_session` records the totals
    pub fn begin_session(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Err(MemoryError::SessionAlreadyActive);
        }
        self.session = Some(SessionTally {
            started_at: self.clock.now(),
            verses_reviewed: 0,
            correct_answers: 0,
        });
        Ok(())
    }

    pub fn active_session(&self) -> Option<&SessionTally> {
        self.session.as_ref()
    }

    /// Close the open session, recording the reviews tallied since it began
    pub fn finish_session(&mut self) -> Result<ReviewSession> {
        let tally = self.session.take().ok_or(MemoryError::NoActiveSession)?;
        let elapsed = (self.clock.now() - tally.started_at).num_seconds().max(0) as u64;
        Ok(self.complete_session(tally.verses_reviewed, tally.correct_answers, elapsed))
    }

    /// Drop the open session without recording it
    pub fn cancel_session(&mut self) -> Option<SessionTally> {
        self.session.take()
    }

    // ===== Statistics =====

    pub fn accuracy(&self) -> f64 {
        self.tracker.accuracy()
    }

    pub fn current_streak(&self) -> u32 {
        self.tracker.effective_streak(self.clock.now())
    }

    pub fn summary(&self) -> ProgressSummary {
        self.tracker
            .summary(&self.catalog, self.clock.now(), self.recent_sessions_limit)
    }

    fn persist(&mut self) {
        let snapshot = self.snapshot();
        match self.gateway.save(&snapshot) {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                log::warn!("Failed to save memory snapshot: {}", e);
                self.last_save_error = Some(e.to_string());
            }
        }
    }
}
