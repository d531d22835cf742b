//! Scripture memorization with spaced repetition
//!
//! This module provides:
//! - Memory verse catalog with filtered and due views
//! - Five-stage mastery state machine with fixed review intervals
//! - Review scheduling and daily streak tracking
//! - The `MemoryEngine` facade that persists after every change

pub mod catalog;
pub mod engine;
mod error;
pub mod mastery;
pub mod models;
pub mod progress;
pub mod scheduler;
pub mod seed;

pub use catalog::VerseCatalog;
pub use engine::{MemoryEngine, OpenError, SessionTally};
pub use error::{IgnoreMissing, MemoryError, Result};
pub use models::*;
pub use progress::{ProgressTracker, StreakChange};
pub use scheduler::{ReviewOutcome, ReviewScheduler};
