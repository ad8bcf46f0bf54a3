//! Card-derived seed material
//!
//! A [`CardSeed`] is a read-only view of the card fields that feed
//! generation. In neutral mode the evidence and source fields are blanked in
//! the view; the card itself is never touched.

use super::stream::SeedMode;
use crate::models::Card;

/// FNV-1a offset basis (32-bit)
const FNV_OFFSET: u32 = 2_166_136_261;
/// FNV-1a prime (32-bit)
const FNV_PRIME: u32 = 16_777_619;

/// Stable 32-bit FNV-1a hash; unlike `DefaultHasher` it never changes
/// across toolchains.
pub fn fnv1a(text: &str) -> u32 {
    text.bytes().fold(FNV_OFFSET, |h, b| (h ^ b as u32).wrapping_mul(FNV_PRIME))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSeed<'a> {
    pub id: &'a str,
    pub domain: &'static str,
    pub concept_ja: &'a str,
    pub evidence_latin: &'a str,
    pub work: &'a str,
    pub file: &'a str,
    pub locator: &'a str,
}

impl<'a> CardSeed<'a> {
    pub fn new(card: &'a Card, mode: SeedMode) -> Self {
        let seed = Self {
            id: &card.id,
            domain: card.domain.name(),
            concept_ja: &card.concept_ja,
            evidence_latin: &card.evidence_latin,
            work: &card.source.work,
            file: &card.source.file,
            locator: card.source.locator.lines(),
        };
        match mode {
            SeedMode::Normal => seed,
            SeedMode::Neutral => Self {
                evidence_latin: "",
                work: "",
                file: "",
                locator: "",
                ..seed
            },
        }
    }

    /// Text folded into the transition model: evidence plus source fields.
    pub fn seed_text(&self) -> String {
        [self.evidence_latin, self.work, self.file, self.locator]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stable string the per-card RNG seed is hashed from. Changing the
    /// source or evidence changes it.
    pub fn seed_string(&self) -> String {
        let concept: String = self.concept_ja.chars().take(50).collect();
        let evidence: String = self.evidence_latin.chars().take(120).collect();
        let parts = [
            self.id,
            self.domain,
            concept.as_str(),
            evidence.as_str(),
            self.work,
            self.locator,
        ];
        let joined = parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("|")
            .to_lowercase();
        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    pub fn hash(&self) -> u32 {
        fnv1a(&self.seed_string())
    }

    /// First two Latin letters of the evidence, used as a word-start hint.
    pub fn start_hint(&self) -> Option<String> {
        let letters: String = self
            .evidence_latin
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .take(2)
            .collect();
        (letters.len() == 2).then_some(letters)
    }
}

/// Concatenated seed text of every card under `mode`.
pub fn seed_text(cards: &[Card], mode: SeedMode) -> String {
    cards
        .iter()
        .map(|c| CardSeed::new(c, mode).seed_text())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
