//! Flashcards and card sets

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum number of cards in one [`CardSet`]
pub const MAX_CARDS: usize = 10;

/// A question/answer pair with both sides non-empty and trimmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flashcard {
    front: String,
    back: String,
}

impl Flashcard {
    /// Build a card from raw sides, trimming both
    ///
    /// Returns `None` if either side is empty after trimming. A card is never
    /// partially accepted.
    pub fn new(front: impl AsRef<str>, back: impl AsRef<str>) -> Option<Self> {
        let front = front.as_ref().trim();
        let back = back.as_ref().trim();
        if front.is_empty() || back.is_empty() {
            return None;
        }
        Some(Self {
            front: front.to_string(),
            back: back.to_string(),
        })
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }
}

impl<'de> Deserialize<'de> for Flashcard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawFlashcard {
            front: String,
            back: String,
        }

        let raw = RawFlashcard::deserialize(deserializer)?;
        Flashcard::new(&raw.front, &raw.back)
            .ok_or_else(|| serde::de::Error::custom("flashcard front and back cannot be empty"))
    }
}

/// Ordered, non-empty set of at most [`MAX_CARDS`] flashcards
///
/// Order is the provider's order and is the browsing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CardSet(Vec<Flashcard>);

impl CardSet {
    /// Build a card set, keeping the first [`MAX_CARDS`] cards
    ///
    /// Returns `None` for an empty input: zero cards is never a valid set.
    pub fn from_cards(mut cards: Vec<Flashcard>) -> Option<Self> {
        if cards.is_empty() {
            return None;
        }
        cards.truncate(MAX_CARDS);
        Some(Self(cards))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Flashcard> {
        self.0.get(index)
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.0
    }

    /// Index of the last card
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }
}

impl<'de> Deserialize<'de> for CardSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cards = Vec::<Flashcard>::deserialize(deserializer)?;
        CardSet::from_cards(cards).ok_or_else(|| serde::de::Error::custom("card set cannot be empty"))
    }
}
