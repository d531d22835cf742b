//! Graded review scheduling
//!
//! The scheduler holds no state of its own: the catalog and progress tracker
//! are passed in, so each review is one `&mut` operation over both.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::VerseCatalog;
use super::error::Result;
use super::mastery;
use super::models::{MasteryLevel, MemoryVerse, ReviewSession};
use super::progress::{ProgressTracker, StreakChange};

/// What a single graded review did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub verse_id: Uuid,
    pub correct: bool,
    pub previous_level: MasteryLevel,
    pub new_level: MasteryLevel,
    pub next_review: DateTime<Utc>,
    /// The verse reached Mastered for the first time
    pub became_mastered: bool,
    pub streak: StreakChange,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewScheduler;

impl ReviewScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Apply a graded review to a verse.
    ///
    /// An unknown id returns `VerseNotFound` and leaves everything untouched.
    pub fn record_review(
        &self,
        catalog: &mut VerseCatalog,
        tracker: &mut ProgressTracker,
        verse_id: Uuid,
        correct: bool,
        now: DateTime<Utc>,
    ) -> Result<ReviewOutcome> {
        let verse = catalog.get_mut(verse_id)?;

        let step = mastery::transition(verse.mastery_level, correct);
        let next_review = mastery::next_review_at(step.to, now);
        // A verse that slips out of Mastered and climbs back is only counted once
        let first_mastery = step.became_mastered && verse.mastered_at.is_none();

        verse.review_count += 1;
        verse.last_reviewed = Some(now);
        verse.mastery_level = step.to;
        if correct {
            verse.correct_count += 1;
        }
        if first_mastery {
            verse.mastered_at = Some(now);
        }
        verse.next_review = Some(next_review);

        tracker.record_attempt(correct, first_mastery);
        let streak = tracker.update_streak(now);

        log::debug!(
            "Reviewed {} ({}): {} -> {}, next review {}",
            verse.reference,
            if correct { "correct" } else { "missed" },
            step.from,
            step.to,
            next_review
        );
        if first_mastery {
            log::info!("Verse mastered: {}", verse.reference);
        }

        Ok(ReviewOutcome {
            verse_id,
            correct,
            previous_level: step.from,
            new_level: step.to,
            next_review,
            became_mastered: first_mastery,
            streak,
        })
    }

    /// What the user should review at `as_of`, most overdue first
    pub fn due_verses<'a>(&self, catalog: &'a VerseCatalog, as_of: DateTime<Utc>) -> Vec<&'a MemoryVerse> {
        catalog.due(as_of)
    }

    /// Record a practice session with caller-supplied totals
    pub fn complete_session<'t>(
        &self,
        tracker: &'t mut ProgressTracker,
        verses_reviewed: u32,
        correct_answers: u32,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> &'t ReviewSession {
        tracker.complete_session(verses_reviewed, correct_answers, duration_secs, now)
    }
}
