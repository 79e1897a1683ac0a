//! Fuzz target for ingestion followed by search.
//!
//! Arbitrary card records and queries must either search successfully or fail
//! with the typed validation error; nothing may panic.

#![no_main]

use arbitrary::Arbitrary;
use cardex_core::{AggregationEngine, CardRecord, Error};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    cards: Vec<(String, String, Option<String>, String, Vec<(String, String)>)>,
    query: String,
}

fuzz_target!(|input: Input| {
    let engine = AggregationEngine::new();

    for (id, name, flavor, set_id, artists) in input.cards.into_iter().take(64) {
        let mut card = CardRecord::new(id, name, set_id);
        card.flavor_name = flavor;
        for (artist_id, artist_name) in artists.into_iter().take(4) {
            card = card.with_artist(artist_id, artist_name);
        }
        engine.track(&card);
        engine.track(&card);
    }
    engine.refresh_artist_name_index();

    for result in [
        engine.search_card_names(&input.query),
        engine.search_artist_names(&input.query),
    ] {
        match result {
            Ok(_) | Err(Error::TermTooShort { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
});
