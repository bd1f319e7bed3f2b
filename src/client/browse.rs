//! Card browsing state machine

use crate::generation::{CardSet, Flashcard};

/// Either no cards, or browsing a card set at an index
///
/// The index is always within the set; moves at either end are no-ops and the
/// index never wraps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BrowsingState {
    #[default]
    NoCards,
    Browsing { cards: CardSet, index: usize },
}

impl BrowsingState {
    /// Enter browsing at the first card of a new set
    pub fn load(&mut self, cards: CardSet) {
        *self = BrowsingState::Browsing { cards, index: 0 };
    }

    /// Advance one card, stopping at the last
    pub fn next(&mut self) {
        if let BrowsingState::Browsing { cards, index } = self {
            *index = (*index + 1).min(cards.last_index());
        }
    }

    /// Go back one card, stopping at the first
    pub fn previous(&mut self) {
        if let BrowsingState::Browsing { index, .. } = self {
            *index = index.saturating_sub(1);
        }
    }

    /// Drop the card set
    pub fn reset(&mut self) {
        *self = BrowsingState::NoCards;
    }

    pub fn has_cards(&self) -> bool {
        matches!(self, BrowsingState::Browsing { .. })
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            BrowsingState::Browsing { index, .. } => Some(*index),
            BrowsingState::NoCards => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            BrowsingState::Browsing { cards, .. } => cards.len(),
            BrowsingState::NoCards => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.has_cards()
    }

    pub fn current(&self) -> Option<&Flashcard> {
        match self {
            BrowsingState::Browsing { cards, index } => cards.get(*index),
            BrowsingState::NoCards => None,
        }
    }

    /// Whether `next` would move
    pub fn can_next(&self) -> bool {
        matches!(self, BrowsingState::Browsing { cards, index } if *index < cards.last_index())
    }

    /// Whether `previous` would move
    pub fn can_previous(&self) -> bool {
        matches!(self, BrowsingState::Browsing { index, .. } if *index > 0)
    }
}
