//! Mastery level state machine
//!
//! Each graded review moves a verse at most one stage:
//! - Correct: up one stage, stopping at Mastered
//! - Incorrect: down one stage, never below Learning
//!
//! New is only ever the state of a verse that has not been reviewed yet.
//! Review intervals are a fixed lookup per stage.

use chrono::{DateTime, Duration, Utc};

use super::models::MasteryLevel;

/// Result of applying one graded review to a mastery level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: MasteryLevel,
    pub to: MasteryLevel,
    /// True only on the step that lands on Mastered
    pub became_mastered: bool,
}

/// Compute the new level after a review
pub fn transition(level: MasteryLevel, correct: bool) -> Transition {
    let to = if correct {
        level.next().unwrap_or(MasteryLevel::Mastered)
    } else {
        match level.previous() {
            Some(lower) if lower >= MasteryLevel::Learning => lower,
            _ => MasteryLevel::Learning,
        }
    };

    Transition {
        from: level,
        to,
        became_mastered: to == MasteryLevel::Mastered && level != MasteryLevel::Mastered,
    }
}

/// Review interval in days for a level
pub fn interval_days(level: MasteryLevel) -> i64 {
    match level {
        MasteryLevel::New => 0,
        MasteryLevel::Learning => 1,
        MasteryLevel::Familiar => 3,
        MasteryLevel::Confident => 7,
        MasteryLevel::Mastered => 14,
    }
}

pub fn review_interval(level: MasteryLevel) -> Duration {
    Duration::days(interval_days(level))
}

/// When a verse that just landed on `level` at `now` should be reviewed next
pub fn next_review_at(level: MasteryLevel, now: DateTime<Utc>) -> DateTime<Utc> {
    now + review_interval(level)
}

/// Intervals (days) each outcome would give, for showing before grading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewPreview {
    pub if_correct: i64,
    pub if_incorrect: i64,
}

pub fn preview(level: MasteryLevel) -> ReviewPreview {
    ReviewPreview {
        if_correct: interval_days(transition(level, true).to),
        if_incorrect: interval_days(transition(level, false).to),
    }
}

/// Format an interval in days to a short label
pub fn format_interval(days: i64) -> String {
    if days <= 0 {
        "now".to_string()
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_correct_advances_one_stage() {
        assert_eq!(transition(MasteryLevel::New, true).to, MasteryLevel::Learning);
        assert_eq!(transition(MasteryLevel::Learning, true).to, MasteryLevel::Familiar);
        assert_eq!(transition(MasteryLevel::Familiar, true).to, MasteryLevel::Confident);
        assert_eq!(transition(MasteryLevel::Confident, true).to, MasteryLevel::Mastered);
        assert_eq!(transition(MasteryLevel::Mastered, true).to, MasteryLevel::Mastered);
    }

    #[test]
    fn test_mastered_event_fires_only_on_entry() {
        assert!(transition(MasteryLevel::Confident, true).became_mastered);
        assert!(!transition(MasteryLevel::Mastered, true).became_mastered);
        assert!(!transition(MasteryLevel::Mastered, false).became_mastered);
        assert!(!transition(MasteryLevel::Familiar, true).became_mastered);
    }

    #[test]
    fn test_incorrect_never_reaches_new() {
        for level in MasteryLevel::ALL {
            let result = transition(level, false);
            assert_ne!(result.to, MasteryLevel::New, "from {:?}", level);
            assert!(result.to >= MasteryLevel::Learning);
        }
        assert_eq!(transition(MasteryLevel::New, false).to, MasteryLevel::Learning);
        assert_eq!(transition(MasteryLevel::Learning, false).to, MasteryLevel::Learning);
        assert_eq!(transition(MasteryLevel::Familiar, false).to, MasteryLevel::Learning);
        assert_eq!(transition(MasteryLevel::Mastered, false).to, MasteryLevel::Confident);
    }

    #[test]
    fn test_interval_table() {
        let days: Vec<i64> = MasteryLevel::ALL.iter().map(|l| interval_days(*l)).collect();
        assert_eq!(days, vec![0, 1, 3, 7, 14]);
    }

    #[test]
    fn test_next_review_at() {
        let now = Utc.with_ymd_and_hms(2026, 4, 10, 18, 45, 0).unwrap();
        assert_eq!(
            next_review_at(MasteryLevel::Confident, now),
            Utc.with_ymd_and_hms(2026, 4, 17, 18, 45, 0).unwrap()
        );
        assert_eq!(next_review_at(MasteryLevel::New, now), now);
    }

    #[test]
    fn test_preview() {
        assert_eq!(
            preview(MasteryLevel::Familiar),
            ReviewPreview { if_correct: 7, if_incorrect: 1 }
        );
        assert_eq!(
            preview(MasteryLevel::Mastered),
            ReviewPreview { if_correct: 14, if_incorrect: 7 }
        );
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "now");
        assert_eq!(format_interval(1), "1d");
        assert_eq!(format_interval(3), "3d");
        assert_eq!(format_interval(7), "1w");
        assert_eq!(format_interval(14), "2w");
        assert_eq!(format_interval(60), "2mo");
        assert_eq!(format_interval(400), "1y");
    }
}
