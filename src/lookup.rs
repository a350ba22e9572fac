//! The card lookup seam.
//!
//! Deck import and search depend only on this trait, so the HTTP client in
//! [`scryfall`](crate::scryfall) can be swapped for an in-memory fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Card;

/// Resolves card printings and free-text queries to [`Card`] records.
#[async_trait]
pub trait CardLookup: Send + Sync {
    /// Fetch a single printing by set code and collector number.
    ///
    /// Returns [`DeckError::NotFound`](crate::DeckError::NotFound) when the
    /// printing does not exist.
    async fn card_by_set_number(&self, set_code: &str, collector_number: &str) -> Result<Card>;

    /// Run a free-text search. Ranking is whatever the remote service does.
    async fn search(&self, query: &str) -> Result<Vec<Card>>;
}
