//! Shared test fixtures for the decksmith integration tests.
//!
//! Provides `FakeLookup`, an in-memory [`CardLookup`] holding a handful of
//! sample printings. It records every lookup key it is asked for so tests can
//! assert on request order and normalisation, and tracks how many lookups
//! were in flight at once.

#![allow(dead_code)]

use async_trait::async_trait;
use decksmith::{Card, CardLookup, DeckError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub struct FakeLookup {
    cards: HashMap<(String, String), Card>,
    requests: Mutex<Vec<(String, String)>>,
    searches: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeLookup {
    /// A lookup knowing the sample printings from [`sample_cards`].
    pub fn new() -> Self {
        Self::with_cards(sample_cards())
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        let cards = cards
            .into_iter()
            .map(|c| ((c.set.to_lowercase(), c.collector_number.clone()), c))
            .collect();
        Self {
            cards,
            requests: Mutex::new(Vec::new()),
            searches: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every (set, number) key requested so far, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    /// Most lookups that were outstanding at the same moment.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn searches(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardLookup for FakeLookup {
    async fn card_by_set_number(&self, set_code: &str, collector_number: &str) -> Result<Card> {
        self.requests
            .lock()
            .unwrap()
            .push((set_code.to_string(), collector_number.to_string()));

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        // Give a concurrent caller the chance to start another lookup.
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        // Mirror Scryfall: set codes in URLs are case-insensitive.
        self.cards
            .get(&(set_code.to_lowercase(), collector_number.to_string()))
            .cloned()
            .ok_or_else(|| {
                DeckError::NotFound(format!("No card {}/{}", set_code, collector_number))
            })
    }

    async fn search(&self, query: &str) -> Result<Vec<Card>> {
        self.searches.lock().unwrap().push(query.to_string());
        if query == "boom" {
            return Err(DeckError::Api {
                status: 503,
                code: "unavailable".into(),
                details: "try later".into(),
            });
        }
        let needle = query.to_lowercase();
        let mut hits: Vec<Card> = self
            .cards
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(hits)
    }
}

pub fn lightning_bolt() -> Card {
    Card::new("Lightning Bolt", "a25", "141")
}

pub fn counterspell() -> Card {
    Card::new("Counterspell", "a25", "50")
}

pub fn brainstorm() -> Card {
    Card::new("Brainstorm", "ice", "50")
}

pub fn fire_ice() -> Card {
    let mut card = Card::new("Fire // Ice", "mh2", "290");
    card.layout = Some("split".into());
    card
}

pub fn sample_cards() -> Vec<Card> {
    vec![lightning_bolt(), counterspell(), brainstorm(), fire_ice()]
}
