//! Streak and aggregate progress tracking

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use super::catalog::VerseCatalog;
use super::models::{MemoryProgress, ProgressSummary, ReviewSession};
use crate::time::Calendar;

/// How a review changed the daily streak
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// First review ever
    Started,
    /// Already reviewed today
    Unchanged,
    /// Reviewed yesterday, streak grew by one
    Extended,
    /// A day or more was missed, streak restarted at one
    Reset,
}

/// Owns the progress aggregate and updates it in place
pub struct ProgressTracker {
    progress: MemoryProgress,
    calendar: Arc<dyn Calendar>,
}

impl ProgressTracker {
    pub fn new(progress: MemoryProgress, calendar: Arc<dyn Calendar>) -> Self {
        Self { progress, calendar }
    }

    pub fn progress(&self) -> &MemoryProgress {
        &self.progress
    }

    // ===== Streak =====

    /// Count a graded review on the calendar day of `now`
    pub fn update_streak(&mut self, now: DateTime<Utc>) -> StreakChange {
        let today = self.calendar.day_of(now);
        let p = &mut self.progress;

        let change = match p.last_review_day {
            None => {
                p.current_streak = 1;
                StreakChange::Started
            }
            Some(last) if last == today => StreakChange::Unchanged,
            Some(last) if self.calendar.days_between(last, today) == 1 => {
                p.current_streak += 1;
                StreakChange::Extended
            }
            Some(_) => {
                p.current_streak = 1;
                StreakChange::Reset
            }
        };

        if change != StreakChange::Unchanged {
            p.last_review_day = Some(today);
        }
        p.longest_streak = p.longest_streak.max(p.current_streak);

        change
    }

    /// The streak as it stands at `now` without recording a review.
    ///
    /// Still intact if the last review was today or yesterday, 0 otherwise.
    pub fn effective_streak(&self, now: DateTime<Utc>) -> u32 {
        let today = self.calendar.day_of(now);
        match self.progress.last_review_day {
            Some(last) if (0..=1).contains(&self.calendar.days_between(last, today)) => {
                self.progress.current_streak
            }
            _ => 0,
        }
    }

    // ===== Counters =====

    pub fn verse_added(&mut self) {
        self.progress.total_verses += 1;
    }

    pub fn verse_removed(&mut self) {
        self.progress.total_verses = self.progress.total_verses.saturating_sub(1);
    }

    /// Count one graded review
    pub fn record_attempt(&mut self, correct: bool, became_mastered: bool) {
        self.progress.total_reviews += 1;
        if correct {
            self.progress.total_correct += 1;
            if became_mastered {
                self.progress.verses_mastered += 1;
            }
        }
    }

    /// Fraction of all reviews answered correctly, 0.0 before any review
    pub fn accuracy(&self) -> f64 {
        if self.progress.total_reviews == 0 {
            0.0
        } else {
            self.progress.total_correct as f64 / self.progress.total_reviews as f64
        }
    }

    // ===== Sessions =====

    /// Record a finished practice session.
    ///
    /// Minutes practiced grows by whole minutes only; leftover seconds are dropped.
    pub fn complete_session(
        &mut self,
        verses_reviewed: u32,
        correct_answers: u32,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> &ReviewSession {
        let session = ReviewSession::new(now, verses_reviewed, correct_answers, duration_secs);
        self.progress.minutes_practiced += duration_secs / 60;
        log::info!(
            "Completed session: {}/{} correct in {}s",
            correct_answers,
            verses_reviewed,
            duration_secs
        );
        self.progress.sessions.push(session);
        &self.progress.sessions[self.progress.sessions.len() - 1]
    }

    /// Up to `limit` sessions, most recent first
    pub fn recent_sessions(&self, limit: usize) -> Vec<ReviewSession> {
        let mut sessions = self.progress.sessions.clone();
        sessions.sort_by(|a, b| b.date.cmp(&a.date));
        sessions.truncate(limit);
        sessions
    }

    /// Minutes practiced in sessions dated at or after `since`
    pub fn minutes_practiced_since(&self, since: DateTime<Utc>) -> u64 {
        self.progress
            .sessions
            .iter()
            .filter(|s| s.date >= since)
            .map(|s| s.duration_secs / 60)
            .sum()
    }

    pub fn minutes_practiced_last_week(&self, now: DateTime<Utc>) -> u64 {
        self.minutes_practiced_since(now - Duration::days(7))
    }

    pub fn summary(&self, catalog: &VerseCatalog, now: DateTime<Utc>, recent: usize) -> ProgressSummary {
        ProgressSummary {
            total_verses: self.progress.total_verses,
            verses_mastered: self.progress.verses_mastered,
            due_now: catalog.due(now).len(),
            current_streak: self.effective_streak(now),
            longest_streak: self.progress.longest_streak,
            total_reviews: self.progress.total_reviews,
            accuracy: self.accuracy(),
            minutes_practiced: self.progress.minutes_practiced,
            levels: catalog.level_breakdown(),
            recent_sessions: self.recent_sessions(recent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FixedOffsetCalendar;
    use chrono::{NaiveDate, TimeZone};

    fn create_test_tracker() -> ProgressTracker {
        let calendar = FixedOffsetCalendar::from_minutes(0).unwrap();
        ProgressTracker::new(MemoryProgress::default(), Arc::new(calendar))
    }

    fn day(d: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, d, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_first_review_starts_streak() {
        let mut tracker = create_test_tracker();
        assert_eq!(tracker.update_streak(day(1, 9)), StreakChange::Started);
        assert_eq!(tracker.progress().current_streak, 1);
        assert_eq!(tracker.progress().longest_streak, 1);
        assert_eq!(tracker.progress().last_review_day, NaiveDate::from_ymd_opt(2026, 8, 1));
    }

    #[test]
    fn test_same_day_is_idempotent() {
        let mut tracker = create_test_tracker();
        tracker.update_streak(day(1, 9));
        tracker.update_streak(day(2, 9));

        assert_eq!(tracker.update_streak(day(2, 21)), StreakChange::Unchanged);
        assert_eq!(tracker.update_streak(day(2, 23)), StreakChange::Unchanged);
        assert_eq!(tracker.progress().current_streak, 2);
    }

    #[test]
    fn test_consecutive_days_extend() {
        let mut tracker = create_test_tracker();
        for d in 1..=5 {
            tracker.update_streak(day(d, 7));
        }
        assert_eq!(tracker.progress().current_streak, 5);
        assert_eq!(tracker.progress().longest_streak, 5);
    }

    #[test]
    fn test_gap_resets_but_keeps_longest() {
        let mut tracker = ProgressTracker::new(
            MemoryProgress {
                current_streak: 200,
                longest_streak: 365,
                last_review_day: NaiveDate::from_ymd_opt(2026, 8, 1),
                ..Default::default()
            },
            Arc::new(FixedOffsetCalendar::from_minutes(0).unwrap()),
        );

        assert_eq!(tracker.update_streak(day(3, 8)), StreakChange::Reset);
        assert_eq!(tracker.progress().current_streak, 1);
        assert_eq!(tracker.progress().longest_streak, 365);
    }

    #[test]
    fn test_future_last_review_day_resets() {
        let mut tracker = ProgressTracker::new(
            MemoryProgress {
                current_streak: 6,
                longest_streak: 9,
                last_review_day: NaiveDate::from_ymd_opt(2026, 8, 10),
                ..Default::default()
            },
            Arc::new(FixedOffsetCalendar::from_minutes(0).unwrap()),
        );

        assert_eq!(tracker.update_streak(day(8, 12)), StreakChange::Reset);
        assert_eq!(tracker.progress().current_streak, 1);
        assert_eq!(tracker.progress().last_review_day, NaiveDate::from_ymd_opt(2026, 8, 8));
        assert_eq!(tracker.progress().longest_streak, 9);
    }

    #[test]
    fn test_streak_uses_calendar_offset() {
        // 23:00 UTC on the 1st and 01:00 UTC on the 2nd are the same day at UTC-3
        let mut tracker = ProgressTracker::new(
            MemoryProgress::default(),
            Arc::new(FixedOffsetCalendar::from_minutes(-180).unwrap()),
        );
        tracker.update_streak(day(1, 23));
        assert_eq!(tracker.update_streak(day(2, 1)), StreakChange::Unchanged);
        assert_eq!(tracker.progress().current_streak, 1);
    }

    #[test]
    fn test_effective_streak() {
        let mut tracker = create_test_tracker();
        tracker.update_streak(day(1, 9));
        tracker.update_streak(day(2, 9));

        assert_eq!(tracker.effective_streak(day(2, 20)), 2);
        assert_eq!(tracker.effective_streak(day(3, 20)), 2);
        assert_eq!(tracker.effective_streak(day(4, 20)), 0);
        // Reading never mutates
        assert_eq!(tracker.progress().current_streak, 2);
    }

    #[test]
    fn test_verse_removed_floors_at_zero() {
        let mut tracker = create_test_tracker();
        tracker.verse_removed();
        assert_eq!(tracker.progress().total_verses, 0);

        tracker.verse_added();
        tracker.verse_added();
        tracker.verse_removed();
        assert_eq!(tracker.progress().total_verses, 1);
    }

    #[test]
    fn test_accuracy() {
        let mut tracker = create_test_tracker();
        assert_eq!(tracker.accuracy(), 0.0);

        tracker.record_attempt(true, false);
        tracker.record_attempt(false, false);
        tracker.record_attempt(true, true);
        tracker.record_attempt(true, false);

        assert!((tracker.accuracy() - 0.75).abs() < f64::EPSILON);
        assert_eq!(tracker.progress().verses_mastered, 1);
    }

    #[test]
    fn test_complete_session() {
        let mut tracker = create_test_tracker();

        let session = tracker.complete_session(10, 7, 359, day(4, 20));
        assert_eq!(session.verses_reviewed, 10);
        assert_eq!(tracker.progress().minutes_practiced, 5);

        tracker.complete_session(3, 3, 61, day(5, 20));
        assert_eq!(tracker.progress().minutes_practiced, 6);
        assert_eq!(tracker.progress().sessions.len(), 2);

        let recent = tracker.recent_sessions(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].date, day(5, 20));

        assert_eq!(tracker.minutes_practiced_since(day(5, 0)), 1);
        assert_eq!(tracker.minutes_practiced_last_week(day(6, 0)), 6);
    }
}
