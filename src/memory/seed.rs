//! Starter verses installed on first run

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::models::{Difficulty, MemoryVerse, VerseCategory};

/// Fixed ids so a re-seeded catalog keeps the same identities
const SEED_ID_BASE: u128 = 0x0000_0000_0000_0000_0002_0000_0000_0000;

struct SeedVerse {
    reference: &'static str,
    text: &'static str,
    category: VerseCategory,
    difficulty: Difficulty,
}

const SEED_VERSES: &[SeedVerse] = &[
    SeedVerse {
        reference: "John 3:16",
        text: "For God so loved the world, that he gave his only begotten Son, that whosoever believeth in him should not perish, but have everlasting life.",
        category: VerseCategory::Salvation,
        difficulty: Difficulty::Easy,
    },
    SeedVerse {
        reference: "Psalm 119:11",
        text: "Thy word have I hid in mine heart, that I might not sin against thee.",
        category: VerseCategory::Wisdom,
        difficulty: Difficulty::Easy,
    },
    SeedVerse {
        reference: "Philippians 4:13",
        text: "I can do all things through Christ which strengtheneth me.",
        category: VerseCategory::Strength,
        difficulty: Difficulty::Easy,
    },
    SeedVerse {
        reference: "Proverbs 3:5-6",
        text: "Trust in the LORD with all thine heart; and lean not unto thine own understanding. In all thy ways acknowledge him, and he shall direct thy paths.",
        category: VerseCategory::Wisdom,
        difficulty: Difficulty::Medium,
    },
    SeedVerse {
        reference: "Jeremiah 29:11",
        text: "For I know the thoughts that I think toward you, saith the LORD, thoughts of peace, and not of evil, to give you an expected end.",
        category: VerseCategory::Promises,
        difficulty: Difficulty::Medium,
    },
    SeedVerse {
        reference: "Isaiah 41:10",
        text: "Fear thou not; for I am with thee: be not dismayed; for I am thy God: I will strengthen thee; yea, I will help thee; yea, I will uphold thee with the right hand of my righteousness.",
        category: VerseCategory::Comfort,
        difficulty: Difficulty::Hard,
    },
    SeedVerse {
        reference: "Philippians 4:6-7",
        text: "Be careful for nothing; but in every thing by prayer and supplication with thanksgiving let your requests be made known unto God. And the peace of God, which passeth all understanding, shall keep your hearts and minds through Christ Jesus.",
        category: VerseCategory::Peace,
        difficulty: Difficulty::Hard,
    },
    SeedVerse {
        reference: "1 Corinthians 13:4",
        text: "Charity suffereth long, and is kind; charity envieth not; charity vaunteth not itself, is not puffed up.",
        category: VerseCategory::Love,
        difficulty: Difficulty::Medium,
    },
    SeedVerse {
        reference: "Hebrews 11:1",
        text: "Now faith is the substance of things hoped for, the evidence of things not seen.",
        category: VerseCategory::Faith,
        difficulty: Difficulty::Easy,
    },
    SeedVerse {
        reference: "Matthew 6:9",
        text: "After this manner therefore pray ye: Our Father which art in heaven, Hallowed be thy name.",
        category: VerseCategory::Prayer,
        difficulty: Difficulty::Easy,
    },
];

pub const SEED_TRANSLATION: &str = "KJV";

/// The starter catalog, every verse due at `now`
pub fn seed_verses(now: DateTime<Utc>) -> Vec<MemoryVerse> {
    SEED_VERSES
        .iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut verse = MemoryVerse::new(
                seed.reference,
                seed.text,
                SEED_TRANSLATION,
                seed.category,
                now,
            )
            .with_difficulty(seed.difficulty);
            verse.id = Uuid::from_u128(SEED_ID_BASE + i as u128 + 1);
            verse.next_review = Some(now);
            verse
        })
        .collect()
}
