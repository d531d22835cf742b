//! The user's collection of memory verses and its derived views

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use super::error::{MemoryError, Result};
use super::models::{LevelBreakdown, MasteryLevel, MemoryVerse, VerseCategory};

#[derive(Debug, Clone, Default)]
pub struct VerseCatalog {
    verses: Vec<MemoryVerse>,
}

impl VerseCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_verses(verses: Vec<MemoryVerse>) -> Self {
        Self { verses }
    }

    pub fn verses(&self) -> &[MemoryVerse] {
        &self.verses
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemoryVerse> {
        self.verses.iter()
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Result<&MemoryVerse> {
        self.verses
            .iter()
            .find(|v| v.id == id)
            .ok_or(MemoryError::VerseNotFound(id))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut MemoryVerse> {
        self.verses
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(MemoryError::VerseNotFound(id))
    }

    // ===== Mutations =====

    /// Add a verse, making it due immediately
    pub fn add(&mut self, mut verse: MemoryVerse, now: DateTime<Utc>) -> Uuid {
        verse.next_review = Some(now);
        let id = verse.id;
        self.verses.push(verse);
        id
    }

    /// Remove a verse, returning it
    pub fn remove(&mut self, id: Uuid) -> Result<MemoryVerse> {
        let pos = self
            .verses
            .iter()
            .position(|v| v.id == id)
            .ok_or(MemoryError::VerseNotFound(id))?;
        Ok(self.verses.remove(pos))
    }

    /// Flip the favorite flag, returning the new value
    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<bool> {
        let verse = self.get_mut(id)?;
        verse.is_favorite = !verse.is_favorite;
        Ok(verse.is_favorite)
    }

    pub fn update_notes(&mut self, id: Uuid, notes: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.notes = notes.into();
        Ok(())
    }

    /// Stamp `mastered_at` on verses that sit at Mastered without one.
    ///
    /// Snapshots written before the field existed carry mastered verses that
    /// were already counted in `verses_mastered`. Returns how many were stamped.
    pub fn backfill_mastered_at(&mut self) -> usize {
        let mut stamped = 0;
        for verse in self.verses.iter_mut() {
            if verse.is_mastered() && verse.mastered_at.is_none() {
                verse.mastered_at = Some(verse.last_reviewed.unwrap_or(verse.created_at));
                stamped += 1;
            }
        }
        stamped
    }

    // ===== Views =====

    /// Verses due at `as_of`, most overdue first.
    ///
    /// A verse with no scheduled review sorts ahead of every dated one.
    pub fn due(&self, as_of: DateTime<Utc>) -> Vec<&MemoryVerse> {
        let mut due: Vec<&MemoryVerse> = self.verses.iter().filter(|v| v.is_due(as_of)).collect();
        due.sort_by(|a, b| by_next_review(a, b));
        due
    }

    /// Verses not yet due but coming due within `within` of `as_of`
    pub fn upcoming(&self, as_of: DateTime<Utc>, within: Duration) -> Vec<&MemoryVerse> {
        let horizon = as_of + within;
        let mut upcoming: Vec<&MemoryVerse> = self
            .verses
            .iter()
            .filter(|v| matches!(v.next_review, Some(next) if next > as_of && next <= horizon))
            .collect();
        upcoming.sort_by(|a, b| by_next_review(a, b));
        upcoming
    }

    pub fn by_level(&self, level: MasteryLevel) -> Vec<&MemoryVerse> {
        self.verses.iter().filter(|v| v.mastery_level == level).collect()
    }

    pub fn mastered(&self) -> Vec<&MemoryVerse> {
        self.by_level(MasteryLevel::Mastered)
    }

    pub fn new_verses(&self) -> Vec<&MemoryVerse> {
        self.by_level(MasteryLevel::New)
    }

    pub fn favorites(&self) -> Vec<&MemoryVerse> {
        self.verses.iter().filter(|v| v.is_favorite).collect()
    }

    /// Verses in `category` (any category when `None`) whose reference or
    /// text contains `query`, ignoring case
    pub fn filtered(&self, category: Option<VerseCategory>, query: &str) -> Vec<&MemoryVerse> {
        let needle = query.to_lowercase();
        self.verses
            .iter()
            .filter(|v| category.map_or(true, |c| v.category == c))
            .filter(|v| v.matches_query(&needle))
            .collect()
    }

    pub fn level_breakdown(&self) -> LevelBreakdown {
        let mut breakdown = LevelBreakdown::default();
        for verse in &self.verses {
            breakdown.add(verse.mastery_level);
        }
        breakdown
    }
}

fn by_next_review(a: &MemoryVerse, b: &MemoryVerse) -> Ordering {
    // Option orders None before Some, which puts unscheduled verses first
    a.next_review
        .cmp(&b.next_review)
        .then_with(|| a.created_at.cmp(&b.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, hour, 0, 0).unwrap()
    }

    fn verse(reference: &str, text: &str, category: VerseCategory) -> MemoryVerse {
        MemoryVerse::new(reference, text, "KJV", category, at(1, 8))
    }

    fn create_test_catalog() -> (VerseCatalog, Uuid, Uuid, Uuid) {
        let mut catalog = VerseCatalog::new();
        let a = catalog.add(
            verse("John 3:16", "For God so loved the world", VerseCategory::Salvation),
            at(1, 8),
        );
        let b = catalog.add(
            verse("Philippians 4:13", "I can do all things through Christ", VerseCategory::Strength),
            at(1, 9),
        );
        let c = catalog.add(
            verse("Proverbs 3:5", "Trust in the LORD with all thine heart", VerseCategory::Wisdom),
            at(1, 10),
        );
        (catalog, a, b, c)
    }

    #[test]
    fn test_add_sets_next_review() {
        let mut catalog = VerseCatalog::new();
        let id = catalog.add(verse("Psalm 23:1", "The LORD is my shepherd", VerseCategory::Comfort), at(3, 7));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(id).unwrap().next_review, Some(at(3, 7)));
    }

    #[test]
    fn test_remove() {
        let (mut catalog, a, _, _) = create_test_catalog();

        let removed = catalog.remove(a).unwrap();
        assert_eq!(removed.reference, "John 3:16");
        assert_eq!(catalog.len(), 2);

        assert_eq!(catalog.remove(a), Err(MemoryError::VerseNotFound(a)));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_toggle_favorite_and_notes() {
        let (mut catalog, a, _, _) = create_test_catalog();

        assert_eq!(catalog.toggle_favorite(a), Ok(true));
        assert_eq!(catalog.favorites().len(), 1);
        assert_eq!(catalog.toggle_favorite(a), Ok(false));
        assert!(catalog.favorites().is_empty());

        catalog.update_notes(a, "Recite before bed").unwrap();
        assert_eq!(catalog.get(a).unwrap().notes, "Recite before bed");

        let missing = Uuid::new_v4();
        assert!(catalog.toggle_favorite(missing).is_err());
        assert!(catalog.update_notes(missing, "x").is_err());
    }

    #[test]
    fn test_due_orders_most_overdue_first() {
        let (mut catalog, a, b, c) = create_test_catalog();
        catalog.get_mut(a).unwrap().next_review = Some(at(4, 8));
        catalog.get_mut(b).unwrap().next_review = None;
        catalog.get_mut(c).unwrap().next_review = Some(at(2, 8));

        let due: Vec<Uuid> = catalog.due(at(5, 0)).iter().map(|v| v.id).collect();
        assert_eq!(due, vec![b, c, a]);

        let due: Vec<Uuid> = catalog.due(at(3, 0)).iter().map(|v| v.id).collect();
        assert_eq!(due, vec![b, c]);
    }

    #[test]
    fn test_due_includes_exact_boundary() {
        let (catalog, a, _, _) = create_test_catalog();
        let due = catalog.due(at(1, 8));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, a);
    }

    #[test]
    fn test_upcoming() {
        let (mut catalog, a, b, c) = create_test_catalog();
        catalog.get_mut(a).unwrap().next_review = Some(at(9, 8));
        catalog.get_mut(b).unwrap().next_review = Some(at(6, 8));
        catalog.get_mut(c).unwrap().next_review = Some(at(30, 8));

        let upcoming: Vec<Uuid> = catalog
            .upcoming(at(5, 0), Duration::days(7))
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(upcoming, vec![b, a]);
    }

    #[test]
    fn test_filtered() {
        let (catalog, a, b, _) = create_test_catalog();

        let hits = catalog.filtered(None, "CHRIST");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, b);

        let hits = catalog.filtered(None, "john");
        assert_eq!(hits[0].id, a);

        assert!(catalog.filtered(Some(VerseCategory::Wisdom), "world").is_empty());
        assert_eq!(catalog.filtered(Some(VerseCategory::Wisdom), "").len(), 1);
        assert_eq!(catalog.filtered(None, "").len(), 3);

        // Whitespace in the query is part of the match
        let hits = catalog.filtered(None, "god ");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, a);
        assert!(catalog.filtered(None, "god  ").is_empty());
    }

    #[test]
    fn test_backfill_mastered_at() {
        let (mut catalog, a, b, _) = create_test_catalog();
        catalog.get_mut(a).unwrap().mastery_level = MasteryLevel::Mastered;
        catalog.get_mut(a).unwrap().last_reviewed = Some(at(4, 8));
        catalog.get_mut(b).unwrap().mastery_level = MasteryLevel::Mastered;
        catalog.get_mut(b).unwrap().mastered_at = Some(at(2, 8));

        assert_eq!(catalog.backfill_mastered_at(), 1);
        assert_eq!(catalog.get(a).unwrap().mastered_at, Some(at(4, 8)));
        assert_eq!(catalog.get(b).unwrap().mastered_at, Some(at(2, 8)));
        assert_eq!(catalog.backfill_mastered_at(), 0);
    }

    #[test]
    fn test_level_views() {
        let (mut catalog, a, b, _) = create_test_catalog();
        catalog.get_mut(a).unwrap().mastery_level = MasteryLevel::Mastered;
        catalog.get_mut(b).unwrap().mastery_level = MasteryLevel::Familiar;

        assert_eq!(catalog.mastered().len(), 1);
        assert_eq!(catalog.new_verses().len(), 1);

        let breakdown = catalog.level_breakdown();
        assert_eq!(breakdown.count(MasteryLevel::Mastered), 1);
        assert_eq!(breakdown.count(MasteryLevel::Familiar), 1);
        assert_eq!(breakdown.count(MasteryLevel::New), 1);
        assert_eq!(breakdown.total(), 3);
    }
}
