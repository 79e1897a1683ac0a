//! Query matching over a [`TrigramIndex`].
//!
//! A candidate is every `(subject, display name)` posting that shares at
//! least one trigram with the normalized search term. Ranking:
//!
//! 1. shared trigram count, descending;
//! 2. normalized length of the posting, ascending (tighter matches first);
//! 3. display name, lexicographic;
//! 4. subject, for full determinism when display names collide.

use std::cmp::Ordering;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{Error, Result};
use crate::index::trigram::{SubjectKey, TrigramIndex};
use crate::text::{char_len, normalize, trigrams, Trigram};

/// One ranked search candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit<K> {
    /// Subject key to resolve the hit by.
    pub key: K,
    /// Display name of the matching posting.
    pub display_name: String,
    /// Number of distinct query trigrams found in the posting.
    pub shared_trigrams: usize,
    /// Char length of the posting's normalized text.
    pub normalized_len: usize,
}

impl<K: Ord> SearchHit<K> {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .shared_trigrams
            .cmp(&self.shared_trigrams)
            .then_with(|| self.normalized_len.cmp(&other.normalized_len))
            .then_with(|| self.display_name.cmp(&other.display_name))
            .then_with(|| self.key.cmp(&other.key))
    }
}

/// Ranks the postings of `index` against `term`.
///
/// # Errors
///
/// Returns [`Error::TermTooShort`] if `term` normalizes to fewer than
/// `min_normalized_len` letters.
pub fn search<K: SubjectKey>(
    term: &str,
    index: &TrigramIndex<K>,
    min_normalized_len: usize,
) -> Result<Vec<SearchHit<K>>> {
    let normalized = normalize(term);
    let actual = char_len(&normalized);
    if actual < min_normalized_len {
        return Err(Error::TermTooShort {
            min: min_normalized_len,
            actual,
        });
    }

    // Repeated query trigrams count once.
    let query: FxHashSet<Trigram> = trigrams(&normalized).map(|(gram, _)| gram).collect();

    let mut scores: FxHashMap<(K, String), (usize, usize)> = FxHashMap::default();
    for gram in &query {
        index.visit_bucket(gram, |subject, display_name, normalized_len| {
            scores
                .entry((subject.clone(), display_name.to_string()))
                .or_insert((0, normalized_len))
                .0 += 1;
        });
    }

    let mut hits: Vec<SearchHit<K>> = scores
        .into_iter()
        .map(|((key, display_name), (shared_trigrams, normalized_len))| SearchHit {
            key,
            display_name,
            shared_trigrams,
            normalized_len,
        })
        .collect();
    hits.sort_by(SearchHit::rank_cmp);

    Ok(hits)
}

/// Collapses ranked hits to distinct keys, keeping each key's best rank.
#[must_use]
pub fn distinct_keys<K: SubjectKey>(hits: Vec<SearchHit<K>>, limit: usize) -> Vec<K> {
    let mut seen: FxHashSet<K> = FxHashSet::default();
    let mut keys = Vec::new();
    for hit in hits {
        if keys.len() == limit {
            break;
        }
        if seen.insert(hit.key.clone()) {
            keys.push(hit.key);
        }
    }
    keys
}
