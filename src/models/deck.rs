use serde::{Deserialize, Serialize};

use super::card::Card;

// ---------------------------------------------------------------------------
// Deck — ordered card records, one entry per physical copy
// ---------------------------------------------------------------------------

/// An ordered sequence of cards. Duplicates are separate copies.
///
/// Serializes as a plain JSON array of card records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    /// Append one copy of `card`.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Append `count` copies of `card`.
    pub fn push_copies(&mut self, card: &Card, count: u32) {
        for _ in 0..count {
            self.cards.push(card.clone());
        }
    }

    /// Remove and return the entry at `index`, or `None` if out of range.
    pub fn remove(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }
}

impl From<Vec<Card>> for Deck {
    fn from(cards: Vec<Card>) -> Self {
        Self { cards }
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}
