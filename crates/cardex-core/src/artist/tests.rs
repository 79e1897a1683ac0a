//! Tests for artist aggregation.

use std::sync::Arc;
use std::thread;

use super::*;

// ========== ArtistAggregate ==========

#[test]
fn test_new_aggregate_is_clean_and_empty() {
    let artist = ArtistAggregate::new("A1");

    let snapshot = artist.snapshot();

    assert_eq!(artist.artist_id(), "A1");
    assert!(!artist.is_dirty());
    assert_eq!(artist.version(), 0);
    assert!(snapshot.names.is_empty());
    assert!(snapshot.card_ids.is_empty());
    assert!(snapshot.set_ids.is_empty());
}

#[test]
fn test_add_name_dirty_flag_precision() {
    let artist = ArtistAggregate::new("A1");

    assert!(artist.add_name("Foo"));
    assert!(artist.is_dirty());

    artist.mark_clean();
    assert!(!artist.is_dirty());

    // Same name again: no change, stays clean.
    assert!(!artist.add_name("Foo"));
    assert!(!artist.is_dirty());
}

#[test]
fn test_add_card_and_set_are_idempotent() {
    let artist = ArtistAggregate::new("A1");
    artist.add_card("c1");
    artist.add_set("s1");
    artist.mark_clean();

    assert!(!artist.add_card("c1"));
    assert!(!artist.add_set("s1"));

    assert!(!artist.is_dirty());
    assert_eq!(artist.version(), 2);
}

#[test]
fn test_blank_values_are_ignored() {
    let artist = ArtistAggregate::new("A1");

    assert!(!artist.add_name(""));
    assert!(!artist.add_name("   "));
    assert!(!artist.add_card("\t"));
    assert!(!artist.add_set("\n "));

    assert!(!artist.is_dirty());
    assert!(artist.snapshot().names.is_empty());
}

#[test]
fn test_name_variants_kept_verbatim() {
    let artist = ArtistAggregate::new("A1");

    artist.add_name("Jane Doe");
    artist.add_name("J. Doe");
    artist.add_name("jane doe");

    assert_eq!(artist.names(), vec!["J. Doe", "Jane Doe", "jane doe"]);
}

#[test]
fn test_observe_applies_all_three() {
    let artist = ArtistAggregate::new("A1");

    assert!(artist.observe("Jane Doe", "c1", "s1"));
    assert!(!artist.observe("Jane Doe", "c1", "s1"));
    assert!(artist.observe("Jane Doe", "c2", "s1"));

    let snapshot = artist.snapshot();
    assert_eq!(snapshot.names, vec!["Jane Doe"]);
    assert_eq!(snapshot.card_ids, vec!["c1", "c2"]);
    assert_eq!(snapshot.set_ids, vec!["s1"]);
    assert_eq!(snapshot.version, 4);
}

#[test]
fn test_mark_clean_if_unchanged_clears_when_no_intervening_write() {
    let artist = ArtistAggregate::new("A1");
    artist.add_name("Jane Doe");
    let snapshot = artist.snapshot();

    assert!(artist.mark_clean_if_unchanged(snapshot.version));
    assert!(!artist.is_dirty());
}

#[test]
fn test_mark_clean_if_unchanged_keeps_intervening_write() {
    let artist = ArtistAggregate::new("A1");
    artist.add_name("Jane Doe");
    let snapshot = artist.snapshot();

    // A write lands between snapshot and clean.
    artist.add_card("c9");

    assert!(!artist.mark_clean_if_unchanged(snapshot.version));
    assert!(artist.is_dirty());
}

#[test]
fn test_mark_clean_is_unconditional() {
    let artist = ArtistAggregate::new("A1");
    artist.add_name("Jane Doe");
    artist.add_card("c9");

    artist.mark_clean();

    assert!(!artist.is_dirty());
}

#[test]
fn test_concurrent_mutation_of_one_aggregate() {
    let artist = Arc::new(ArtistAggregate::new("A1"));
    let mut handles = vec![];

    for t in 0..8 {
        let artist = Arc::clone(&artist);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                artist.observe("Jane Doe", &format!("c{t}-{i}"), &format!("s{}", i % 5));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let snapshot = artist.snapshot();
    assert_eq!(snapshot.names.len(), 1);
    assert_eq!(snapshot.card_ids.len(), 800);
    assert_eq!(snapshot.set_ids.len(), 5);
    // One bump per effective insert: 1 name + 800 cards + 5 sets.
    assert_eq!(snapshot.version, 806);
}

// ========== ArtistRegistry ==========

#[test]
fn test_get_or_create_returns_same_aggregate() {
    let registry = ArtistRegistry::new();

    let first = registry.get_or_create("A1");
    let second = registry.get_or_create("A1");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_get_does_not_create() {
    let registry = ArtistRegistry::new();

    assert!(registry.get("A1").is_none());
    assert!(registry.is_empty());
}

#[test]
fn test_all_sorted_and_dirty_filtered() {
    let registry = ArtistRegistry::new();
    registry.get_or_create("B").add_name("Bee");
    registry.get_or_create("A").add_name("Ay");
    registry.get_or_create("C");

    let all: Vec<String> = registry
        .all()
        .iter()
        .map(|a| a.artist_id().to_string())
        .collect();
    let dirty: Vec<String> = registry
        .dirty()
        .iter()
        .map(|a| a.artist_id().to_string())
        .collect();

    assert_eq!(all, vec!["A", "B", "C"]);
    assert_eq!(dirty, vec!["A", "B"]);
}

#[test]
fn test_mark_all_clean_and_clear() {
    let registry = ArtistRegistry::new();
    registry.get_or_create("A").add_name("Ay");
    registry.get_or_create("B").add_name("Bee");

    registry.mark_all_clean();
    assert!(registry.dirty().is_empty());

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn test_concurrent_get_or_create_single_instance() {
    let registry = Arc::new(ArtistRegistry::new());
    let mut handles = vec![];

    for t in 0..8 {
        let registry = Arc::clone(&registry);
        handles.push(thread::spawn(move || {
            for i in 0..50 {
                registry
                    .get_or_create(&format!("A{}", i % 10))
                    .add_card(&format!("c{t}-{i}"));
            }
        }));
    }
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(registry.len(), 10);
    let total_cards: usize = registry.all().iter().map(|a| a.snapshot().card_ids.len()).sum();
    assert_eq!(total_cards, 400);
}
