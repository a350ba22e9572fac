//! Decksmith session tests with injected lookup and repository.

mod common;

use common::FakeLookup;
use decksmith::{Deck, DeckError, Decksmith, MemoryDeckRepository};
use std::fs;

fn setup() -> Decksmith {
    Decksmith::builder()
        .lookup(Box::new(FakeLookup::new()))
        .repository(Box::new(MemoryDeckRepository::new()))
        .build()
        .unwrap()
}

// ---------------------------------------------------------------------------
// search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_stores_results() {
    let mut ds = setup();
    let results = ds.search("bolt").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Lightning Bolt");
    assert_eq!(ds.search_results().len(), 1);
}

#[tokio::test]
async fn search_without_matches_keeps_previous_results() {
    let mut ds = setup();
    ds.search("bolt").await.unwrap();

    let err = ds.search("no such card").await.unwrap_err();
    assert!(matches!(err, DeckError::NotFound(_)));
    assert_eq!(ds.search_results()[0].name, "Lightning Bolt");
}

#[tokio::test]
async fn search_error_keeps_previous_results() {
    let mut ds = setup();
    ds.search("counter").await.unwrap();

    let err = ds.search("boom").await.unwrap_err();
    assert!(matches!(err, DeckError::Api { status: 503, .. }));
    assert_eq!(ds.search_results()[0].name, "Counterspell");
}

// ---------------------------------------------------------------------------
// deck editing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_search_result_appends_copies() {
    let mut ds = setup();
    ds.search("bolt").await.unwrap();
    ds.add_search_result(0).unwrap();
    let added = ds.add_search_result(0).unwrap();
    assert_eq!(added.name, "Lightning Bolt");
    assert_eq!(ds.deck().len(), 2);
}

#[tokio::test]
async fn add_search_result_out_of_range() {
    let mut ds = setup();
    ds.search("bolt").await.unwrap();
    let err = ds.add_search_result(5).unwrap_err();
    assert!(matches!(err, DeckError::InvalidArgument(_)));
    assert!(ds.deck().is_empty());
}

#[test]
fn remove_from_deck_by_position() {
    let mut ds = setup();
    ds.add_to_deck(common::lightning_bolt());
    ds.add_to_deck(common::counterspell());
    ds.add_to_deck(common::brainstorm());

    let removed = ds.remove_from_deck(1).unwrap();
    assert_eq!(removed.name, "Counterspell");
    let names: Vec<&str> = ds.deck().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Lightning Bolt", "Brainstorm"]);

    assert!(ds.remove_from_deck(2).is_none());
    assert_eq!(ds.deck().len(), 2);
}

#[test]
fn add_copies_respects_limit() {
    let mut ds = setup();
    ds.add_copies(&common::brainstorm(), 4).unwrap();
    assert_eq!(ds.deck().len(), 4);

    let err = ds
        .add_copies(&common::brainstorm(), decksmith::config::MAX_COPIES_PER_LINE + 1)
        .unwrap_err();
    assert!(matches!(err, DeckError::InvalidArgument(_)));
    assert_eq!(ds.deck().len(), 4);
}

// ---------------------------------------------------------------------------
// import / export
// ---------------------------------------------------------------------------

#[test]
fn export_uses_current_deck() {
    let mut ds = setup();
    assert_eq!(ds.export(), "");
    ds.add_to_deck(common::brainstorm());
    ds.add_to_deck(common::brainstorm());
    assert_eq!(ds.export(), "2 Brainstorm (ICE) 50");
}

#[test]
fn export_to_file_writes_decklist_txt() {
    let tmp = tempfile::tempdir().unwrap();
    let mut ds = setup();
    ds.add_to_deck(common::lightning_bolt());

    let path = ds.export_to_file(tmp.path()).unwrap();
    assert_eq!(path, tmp.path().join("decklist.txt"));
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "1 Lightning Bolt (A25) 141"
    );
}

#[tokio::test]
async fn import_replaces_current_deck() {
    let mut ds = setup();
    ds.add_to_deck(common::brainstorm());

    let report = ds
        .import("2 Counterspell (A25) 50\nbad line\n1 Nope (ZZZ) 1")
        .await;
    assert_eq!(report.diagnostics.len(), 2);
    let names: Vec<&str> = ds.deck().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Counterspell", "Counterspell"]);
    assert_eq!(&report.deck, ds.deck());
}

#[tokio::test]
async fn import_of_nothing_empties_deck() {
    let mut ds = setup();
    ds.add_to_deck(common::brainstorm());
    let report = ds.import("   ").await;
    assert!(report.is_clean());
    assert!(ds.deck().is_empty());
}

// ---------------------------------------------------------------------------
// save / load
// ---------------------------------------------------------------------------

#[test]
fn save_and_load_named_decks() {
    let mut ds = setup();
    ds.add_to_deck(common::lightning_bolt());
    ds.save("burn").unwrap();

    ds.remove_from_deck(0);
    ds.add_to_deck(common::counterspell());
    ds.save("control").unwrap();

    assert_eq!(
        ds.saved_decks().unwrap(),
        vec!["burn".to_string(), "control".to_string()]
    );

    assert!(ds.load("burn").unwrap());
    assert_eq!(ds.deck(), &Deck::from(vec![common::lightning_bolt()]));
}

#[test]
fn load_missing_deck_leaves_current_deck() {
    let mut ds = setup();
    ds.add_to_deck(common::fire_ice());
    assert!(!ds.load("missing").unwrap());
    assert_eq!(ds.deck().len(), 1);
}

#[test]
fn save_requires_a_name() {
    let mut ds = setup();
    assert!(matches!(ds.save(""), Err(DeckError::InvalidArgument(_))));
    assert!(ds.saved_decks().unwrap().is_empty());
}

#[test]
fn builder_with_store_path_persists_to_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let store = tmp.path().join("decks.json");

    let mut ds = Decksmith::builder()
        .lookup(Box::new(FakeLookup::new()))
        .store_path(&store)
        .build()
        .unwrap();
    ds.add_to_deck(common::brainstorm());
    ds.save("cantrips").unwrap();

    let mut reopened = Decksmith::builder()
        .lookup(Box::new(FakeLookup::new()))
        .store_path(&store)
        .build()
        .unwrap();
    assert_eq!(reopened.saved_decks().unwrap(), vec!["cantrips".to_string()]);
    assert!(reopened.load("cantrips").unwrap());
    assert_eq!(reopened.export(), "1 Brainstorm (ICE) 50");
}

#[test]
fn builder_rejects_bad_api_base() {
    let tmp = tempfile::tempdir().unwrap();
    let result = Decksmith::builder()
        .api_base("::not a url::")
        .store_path(tmp.path().join("decks.json"))
        .build();
    assert!(matches!(result, Err(DeckError::InvalidArgument(_))));
}
