//! Data models for verse memorization

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::MemoryError;

/// Memorization stage of a verse, ordered from least to most confident.
///
/// Serialized as its numeric rank (0-4) so snapshots stay compact and
/// any rank outside the five stages is rejected on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MasteryLevel {
    /// Added but never reviewed
    New,
    Learning,
    Familiar,
    Confident,
    Mastered,
}

impl MasteryLevel {
    pub const ALL: [MasteryLevel; 5] = [
        MasteryLevel::New,
        MasteryLevel::Learning,
        MasteryLevel::Familiar,
        MasteryLevel::Confident,
        MasteryLevel::Mastered,
    ];

    pub fn rank(self) -> u8 {
        match self {
            Self::New => 0,
            Self::Learning => 1,
            Self::Familiar => 2,
            Self::Confident => 3,
            Self::Mastered => 4,
        }
    }

    pub fn from_rank(rank: u8) -> Option<Self> {
        Self::ALL.get(rank as usize).copied()
    }

    /// The next stage up, or `None` at Mastered
    pub fn next(self) -> Option<Self> {
        Self::from_rank(self.rank() + 1)
    }

    /// The next stage down, or `None` at New
    pub fn previous(self) -> Option<Self> {
        self.rank().checked_sub(1).and_then(Self::from_rank)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Learning => "Learning",
            Self::Familiar => "Familiar",
            Self::Confident => "Confident",
            Self::Mastered => "Mastered",
        }
    }
}

impl Default for MasteryLevel {
    fn default() -> Self {
        Self::New
    }
}

impl TryFrom<u8> for MasteryLevel {
    type Error = MemoryError;

    fn try_from(rank: u8) -> Result<Self, Self::Error> {
        Self::from_rank(rank).ok_or(MemoryError::InvalidMasteryLevel(rank))
    }
}

impl From<MasteryLevel> for u8 {
    fn from(level: MasteryLevel) -> Self {
        level.rank()
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Topical grouping used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerseCategory {
    Promises,
    Comfort,
    Faith,
    Wisdom,
    Salvation,
    Love,
    Strength,
    Peace,
    Prayer,
    Other,
}

impl VerseCategory {
    pub fn label(self) -> &'static str {
        match self {
            Self::Promises => "Promises",
            Self::Comfort => "Comfort",
            Self::Faith => "Faith",
            Self::Wisdom => "Wisdom",
            Self::Salvation => "Salvation",
            Self::Love => "Love",
            Self::Strength => "Strength",
            Self::Peace => "Peace",
            Self::Prayer => "Prayer",
            Self::Other => "Other",
        }
    }
}

impl Default for VerseCategory {
    fn default() -> Self {
        Self::Other
    }
}

/// How hard the passage is expected to be to memorize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// A passage the user is memorizing, with its review state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryVerse {
    pub id: Uuid,
    /// Human-readable reference, e.g. "Psalm 119:11"
    pub reference: String,
    /// Passage text to recall
    pub text: String,
    /// Translation label, e.g. "ESV"
    pub translation: String,
    #[serde(default)]
    pub category: VerseCategory,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    /// When the verse is next due; absent means due immediately
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review: Option<DateTime<Utc>>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub correct_count: u32,
    #[serde(default)]
    pub mastery_level: MasteryLevel,
    /// First time the verse reached Mastered; later returns don't reset it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mastered_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub notes: String,
}

impl MemoryVerse {
    pub fn new(
        reference: impl Into<String>,
        text: impl Into<String>,
        translation: impl Into<String>,
        category: VerseCategory,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference: reference.into(),
            text: text.into(),
            translation: translation.into(),
            category,
            difficulty: Difficulty::default(),
            created_at,
            last_reviewed: None,
            next_review: None,
            review_count: 0,
            correct_count: 0,
            mastery_level: MasteryLevel::New,
            mastered_at: None,
            is_favorite: false,
            notes: String::new(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Fraction of reviews answered correctly, 0.0 when never reviewed
    pub fn accuracy(&self) -> f64 {
        if self.review_count == 0 {
            0.0
        } else {
            self.correct_count as f64 / self.review_count as f64
        }
    }

    /// Check if the verse is due for review at `as_of`
    pub fn is_due(&self, as_of: DateTime<Utc>) -> bool {
        self.next_review.map_or(true, |next| next <= as_of)
    }

    pub fn is_mastered(&self) -> bool {
        self.mastery_level == MasteryLevel::Mastered
    }

    /// Case-insensitive substring match against reference and text.
    /// `needle` must already be lowercased.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.reference.to_lowercase().contains(needle)
            || self.text.to_lowercase().contains(needle)
    }
}

/// A completed practice session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub verses_reviewed: u32,
    pub correct_answers: u32,
    /// Session length in seconds
    pub duration_secs: u64,
}

impl ReviewSession {
    pub fn new(
        date: DateTime<Utc>,
        verses_reviewed: u32,
        correct_answers: u32,
        duration_secs: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            verses_reviewed,
            correct_answers,
            duration_secs,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.verses_reviewed == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.verses_reviewed as f64
        }
    }
}

/// Aggregate progress across the whole catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryProgress {
    #[serde(default)]
    pub total_verses: u32,
    #[serde(default)]
    pub verses_mastered: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    /// Calendar day of the most recent graded review
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_review_day: Option<NaiveDate>,
    #[serde(default)]
    pub total_reviews: u32,
    #[serde(default)]
    pub total_correct: u32,
    #[serde(default)]
    pub minutes_practiced: u64,
    #[serde(default)]
    pub sessions: Vec<ReviewSession>,
}

/// Everything persisted for one user, saved as a single unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub verses: Vec<MemoryVerse>,
    pub progress: MemoryProgress,
}

/// Count of verses at each mastery stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelBreakdown {
    pub new: usize,
    pub learning: usize,
    pub familiar: usize,
    pub confident: usize,
    pub mastered: usize,
}

impl LevelBreakdown {
    pub fn count(&self, level: MasteryLevel) -> usize {
        match level {
            MasteryLevel::New => self.new,
            MasteryLevel::Learning => self.learning,
            MasteryLevel::Familiar => self.familiar,
            MasteryLevel::Confident => self.confident,
            MasteryLevel::Mastered => self.mastered,
        }
    }

    pub(crate) fn add(&mut self, level: MasteryLevel) {
        match level {
            MasteryLevel::New => self.new += 1,
            MasteryLevel::Learning => self.learning += 1,
            MasteryLevel::Familiar => self.familiar += 1,
            MasteryLevel::Confident => self.confident += 1,
            MasteryLevel::Mastered => self.mastered += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.new + self.learning + self.familiar + self.confident + self.mastered
    }
}

/// Dashboard view of progress, computed on demand
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub total_verses: u32,
    pub verses_mastered: u32,
    pub due_now: usize,
    /// Streak as it stands today; 0 once a day has been missed
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_reviews: u32,
    pub accuracy: f64,
    pub minutes_practiced: u64,
    pub levels: LevelBreakdown,
    pub recent_sessions: Vec<ReviewSession>,
}
