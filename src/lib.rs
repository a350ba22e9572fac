//! Deck building for Magic: The Gathering.
//!
//! Search the Scryfall card database, collect printings into a deck, move
//! decks in and out of the common plain-text deck list format, and keep
//! named decks in a local store.
//!
//! # Quick start
//!
//! ```no_run
//! use decksmith::Decksmith;
//!
//! # async fn example() -> decksmith::Result<()> {
//! let mut ds = Decksmith::builder().build()?;
//!
//! // Search and add the top hit
//! ds.search("lightning bolt").await?;
//! ds.add_search_result(0)?;
//!
//! // Round-trip through the text format
//! let text = ds.export();
//! let report = ds.import(&text).await;
//! assert!(report.is_clean());
//!
//! ds.save("burn")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decklist;
pub mod error;
pub mod lookup;
pub mod models;
pub mod repository;
pub mod scryfall;

pub use decklist::{
    export_deck, import_deck, parse_line, DeckListEntry, ImportDiagnostic, ImportReport,
    ImportWarning,
};
pub use error::{DeckError, Result};
pub use lookup::CardLookup;
pub use models::{Card, Deck};
pub use repository::{DeckRepository, FileDeckRepository, MemoryDeckRepository};
pub use scryfall::ScryfallClient;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

// ---------------------------------------------------------------------------
// DecksmithBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`Decksmith`] instance.
///
/// Use [`Decksmith::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](DecksmithBuilder::build).
pub struct DecksmithBuilder {
    api_base: String,
    timeout: Duration,
    max_search_pages: usize,
    store_path: Option<PathBuf>,
    lookup: Option<Box<dyn CardLookup>>,
    repository: Option<Box<dyn DeckRepository>>,
}

impl Default for DecksmithBuilder {
    fn default() -> Self {
        Self {
            api_base: config::API_BASE.to_string(),
            timeout: config::DEFAULT_TIMEOUT,
            max_search_pages: config::DEFAULT_MAX_SEARCH_PAGES,
            store_path: None,
            lookup: None,
            repository: None,
        }
    }
}

impl DecksmithBuilder {
    /// Base URL of the Scryfall API. Defaults to [`config::API_BASE`].
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// How many result pages one search may follow. Defaults to 1.
    pub fn max_search_pages(mut self, pages: usize) -> Self {
        self.max_search_pages = pages;
        self
    }

    /// Path of the JSON deck store.
    ///
    /// If not set, `decks.json` in the platform data directory is used
    /// (e.g. `~/.local/share/decksmith/decks.json` on Linux).
    pub fn store_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.store_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use `lookup` instead of a Scryfall HTTP client.
    ///
    /// `api_base`, `timeout` and `max_search_pages` are then ignored.
    pub fn lookup(mut self, lookup: Box<dyn CardLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Use `repository` instead of the on-disk store. Overrides `store_path`.
    pub fn repository(mut self, repository: Box<dyn DeckRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Build the instance. No network traffic happens here.
    pub fn build(self) -> Result<Decksmith> {
        let lookup = match self.lookup {
            Some(lookup) => lookup,
            None => Box::new(ScryfallClient::new(
                &self.api_base,
                self.timeout,
                self.max_search_pages,
            )?),
        };
        let repository = match self.repository {
            Some(repository) => repository,
            None => match self.store_path {
                Some(path) => Box::new(FileDeckRepository::new(path)?),
                None => Box::new(FileDeckRepository::open_default()?),
            },
        };
        Ok(Decksmith {
            lookup,
            repository,
            deck: Deck::new(),
            search_results: Vec::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// Decksmith
// ---------------------------------------------------------------------------

/// A deck-building session.
///
/// Holds the deck being edited and the latest search results, and owns the
/// injected [`CardLookup`] and [`DeckRepository`]. Import and load replace
/// the current deck wholesale; nothing else touches it.
pub struct Decksmith {
    lookup: Box<dyn CardLookup>,
    repository: Box<dyn DeckRepository>,
    deck: Deck,
    search_results: Vec<Card>,
}

impl Decksmith {
    /// Create a new builder.
    pub fn builder() -> DecksmithBuilder {
        DecksmithBuilder::default()
    }

    // -- Search ------------------------------------------------------------

    /// Run a free-text search and keep the results.
    ///
    /// On failure, including a search with no matches, the previous results
    /// are left untouched and the error is returned.
    pub async fn search(&mut self, query: &str) -> Result<&[Card]> {
        let cards = match self.lookup.search(query).await {
            Ok(cards) if cards.is_empty() => {
                Err(DeckError::NotFound(format!("No cards matched {:?}", query)))
            }
            other => other,
        }
        .map_err(|e| {
            warn!(query, error = %e, "search failed");
            e
        })?;

        self.search_results = cards;
        Ok(&self.search_results)
    }

    pub fn search_results(&self) -> &[Card] {
        &self.search_results
    }

    // -- Deck editing ------------------------------------------------------

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Append one copy of `card` to the deck.
    pub fn add_to_deck(&mut self, card: Card) {
        self.deck.push(card);
    }

    /// Append `count` copies of `card`.
    ///
    /// Counts above [`config::MAX_COPIES_PER_LINE`] are rejected and leave
    /// the deck untouched.
    pub fn add_copies(&mut self, card: &Card, count: u32) -> Result<()> {
        if count > config::MAX_COPIES_PER_LINE {
            return Err(DeckError::InvalidArgument(format!(
                "count {} exceeds the limit of {} copies",
                count,
                config::MAX_COPIES_PER_LINE
            )));
        }
        self.deck.push_copies(card, count);
        Ok(())
    }

    /// Append one copy of the search result at `index`.
    pub fn add_search_result(&mut self, index: usize) -> Result<&Card> {
        let card = self.search_results.get(index).cloned().ok_or_else(|| {
            DeckError::InvalidArgument(format!(
                "search result index {} out of range ({} results)",
                index,
                self.search_results.len()
            ))
        })?;
        self.deck.push(card);
        Ok(&self.deck.cards()[self.deck.len() - 1])
    }

    /// Remove the deck entry at `index`, returning it.
    pub fn remove_from_deck(&mut self, index: usize) -> Option<Card> {
        self.deck.remove(index)
    }

    // -- Import / export ---------------------------------------------------

    /// The current deck as deck list text.
    pub fn export(&self) -> String {
        export_deck(&self.deck)
    }

    /// Write the deck list to `decklist.txt` inside `dir`.
    pub fn export_to_file<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(config::EXPORT_FILE_NAME);
        fs::write(&path, self.export())?;
        info!(path = %path.display(), cards = self.deck.len(), "deck list exported");
        Ok(path)
    }

    /// Import deck list text, replacing the current deck with whatever
    /// resolved. Per-line problems are in the returned report.
    pub async fn import(&mut self, text: &str) -> ImportReport {
        let report = import_deck(text, self.lookup.as_ref()).await;
        self.deck = report.deck.clone();
        report
    }

    // -- Persistence -------------------------------------------------------

    /// Save the current deck under `name`, overwriting any previous save.
    pub fn save(&mut self, name: &str) -> Result<()> {
        self.repository.save(name, &self.deck)
    }

    /// Replace the current deck with the one saved under `name`.
    ///
    /// Returns `false`, leaving the deck untouched, when nothing is saved
    /// under that name.
    pub fn load(&mut self, name: &str) -> Result<bool> {
        match self.repository.get(name)? {
            Some(deck) => {
                self.deck = deck;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Names of all saved decks.
    pub fn saved_decks(&self) -> Result<Vec<String>> {
        self.repository.list()
    }

    pub fn lookup(&self) -> &dyn CardLookup {
        self.lookup.as_ref()
    }
}

impl fmt::Display for Decksmith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Decksmith(deck={} cards, search_results={})",
            self.deck.len(),
            self.search_results.len()
        )
    }
}
