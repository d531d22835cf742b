//! Spaced-repetition engine for memorizing scripture.
//!
//! A host application opens a [`MemoryEngine`] over a [`PersistenceGateway`]
//! and drives it with graded reviews:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hidden_word::config::EngineConfig;
//! use hidden_word::time::SystemClock;
//! use hidden_word::MemoryEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::default();
//! let mut engine = MemoryEngine::open_with_config(&config, Arc::new(SystemClock))?;
//!
//! let due: Vec<_> = engine.due_verses().iter().map(|v| v.id).collect();
//! engine.begin_session()?;
//! for id in due {
//!     engine.record_review(id, true)?;
//! }
//! engine.finish_session()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod memory;
pub mod storage;
pub mod time;

pub use memory::{
    MasteryLevel, MemoryEngine, MemoryError, MemoryProgress, MemoryVerse, ReviewOutcome,
    ReviewSession, Snapshot, VerseCategory,
};
pub use storage::{InMemoryStore, JsonFileStore, PersistenceGateway, StorageError};
