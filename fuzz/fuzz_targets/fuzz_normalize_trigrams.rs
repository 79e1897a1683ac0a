//! Fuzz target for normalization and trigram generation.
//!
//! Arbitrary UTF-8 must never panic, normalized output must be letters only,
//! and every trigram must sit at its reported char offset.

#![no_main]

use cardex_core::text::{normalize, trigrams};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: &str| {
    let normalized = normalize(text);
    assert!(normalized.chars().all(char::is_alphabetic));

    let chars: Vec<char> = normalized.chars().collect();
    let grams: Vec<_> = trigrams(&normalized).collect();
    assert_eq!(grams.len(), chars.len().saturating_sub(2));

    for (gram, position) in grams {
        let p = position as usize;
        assert_eq!(&chars[p..p + 3], &gram[..]);
    }
});
