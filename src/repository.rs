//! Named-deck persistence.
//!
//! Decks are stored in a flat key-value namespace under the key
//! `"deck-" + name`. [`FileDeckRepository`] keeps the whole namespace in one
//! JSON object on disk; [`MemoryDeckRepository`] keeps it in memory.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config;
use crate::error::{DeckError, Result};
use crate::models::Deck;

/// Storage for named decks.
pub trait DeckRepository: Send {
    /// Load the deck saved under `name`, if any.
    fn get(&self, name: &str) -> Result<Option<Deck>>;

    /// Save `deck` under `name`, replacing any deck already saved there.
    fn save(&mut self, name: &str, deck: &Deck) -> Result<()>;

    /// Names of all saved decks, sorted.
    fn list(&self) -> Result<Vec<String>>;
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DeckError::InvalidArgument("deck name is empty".into()));
    }
    Ok(())
}

fn names_from_keys<'a>(keys: impl Iterator<Item = &'a String>) -> Vec<String> {
    keys.filter_map(|k| k.strip_prefix(config::DECK_KEY_PREFIX))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// MemoryDeckRepository
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryDeckRepository {
    entries: BTreeMap<String, Deck>,
}

impl MemoryDeckRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeckRepository for MemoryDeckRepository {
    fn get(&self, name: &str) -> Result<Option<Deck>> {
        Ok(self.entries.get(&config::deck_key(name)).cloned())
    }

    fn save(&mut self, name: &str, deck: &Deck) -> Result<()> {
        validate_name(name)?;
        self.entries.insert(config::deck_key(name), deck.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(names_from_keys(self.entries.keys()))
    }
}

// ---------------------------------------------------------------------------
// FileDeckRepository
// ---------------------------------------------------------------------------

/// Deck store backed by a single JSON file.
///
/// The file holds one object mapping storage keys to serialized decks. Keys
/// without the `deck-` prefix are preserved but never listed. The file is
/// re-read on every call and rewritten atomically on save, so several
/// processes can share it (last writer wins).
#[derive(Debug, Clone)]
pub struct FileDeckRepository {
    path: PathBuf,
}

impl FileDeckRepository {
    /// Open (or lazily create) the store at `path`.
    ///
    /// Creates the parent directory if it does not exist.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Open the store at the platform data directory.
    pub fn open_default() -> Result<Self> {
        Self::new(config::default_store_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|e| {
            DeckError::InvalidArgument(format!(
                "Deck store {} is not a JSON object: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Write to a temp file beside the store and rename it into place, so an
    /// interrupted write never leaves a truncated store behind.
    fn store(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| DeckError::Io(e.error))?;
        Ok(())
    }
}

impl DeckRepository for FileDeckRepository {
    fn get(&self, name: &str) -> Result<Option<Deck>> {
        let mut entries = self.load()?;
        match entries.remove(&config::deck_key(name)) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, name: &str, deck: &Deck) -> Result<()> {
        validate_name(name)?;
        let mut entries = self.load()?;
        let key = config::deck_key(name);
        let replaced = entries
            .insert(key, serde_json::to_value(deck)?)
            .is_some();
        self.store(&entries)?;
        debug!(path = %self.path.display(), replaced, "deck store written");
        info!(name, cards = deck.len(), "deck saved");
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(names_from_keys(self.load()?.keys()))
    }
}
