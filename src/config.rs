use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://api.scryfall.com";

pub const USER_AGENT: &str = concat!("decksmith/", env!("CARGO_PKG_VERSION"));

/// Prefix of every saved-deck key in a [`DeckRepository`](crate::repository::DeckRepository).
pub const DECK_KEY_PREFIX: &str = "deck-";

/// File name used when exporting a deck list to disk.
pub const EXPORT_FILE_NAME: &str = "decklist.txt";

/// Largest count a single deck list line may ask for.
pub const MAX_COPIES_PER_LINE: u32 = 1_000;

pub const STORE_FILE_NAME: &str = "decks.json";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of result pages fetched per search unless configured otherwise.
pub const DEFAULT_MAX_SEARCH_PAGES: usize = 1;

/// Storage key for a deck saved under `name`.
pub fn deck_key(name: &str) -> String {
    format!("{}{}", DECK_KEY_PREFIX, name)
}

pub fn default_data_dir() -> PathBuf {
    if let Some(data) = dirs::data_dir() {
        data.join("decksmith")
    } else {
        PathBuf::from(".decksmith")
    }
}

pub fn default_store_path() -> PathBuf {
    default_data_dir().join(STORE_FILE_NAME)
}
