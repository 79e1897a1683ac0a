//! Concurrent trigram → postings index.
//!
//! Two-level locking keeps ingestion workers parallel:
//! - the bucket table is a `DashMap`, so get-or-create of a trigram bucket is
//!   atomic and only contends on one shard;
//! - each bucket owns a `parking_lot::Mutex` around its postings, so every
//!   position insert into a posting is serialized without an index-wide lock.
//!
//! Lock order is always shard → bucket. Nothing acquires a shard lock while
//! holding a bucket lock.

use std::collections::BTreeSet;
use std::hash::Hash;

use dashmap::mapref::one::Ref;
use dashmap::DashMap;
use parking_lot::Mutex;
use rustc_hash::{FxBuildHasher, FxHashMap};
use serde::Serialize;

use crate::text::{char_len, trigram_to_string, Trigram};

/// Bounds required of a subject key stored in a [`TrigramIndex`].
pub trait SubjectKey: Clone + Eq + Hash + Ord + Send + Sync {}

impl<T: Clone + Eq + Hash + Ord + Send + Sync> SubjectKey for T {}

/// Per-posting state inside a bucket.
#[derive(Debug)]
struct PostingEntry {
    normalized: String,
    normalized_len: usize,
    positions: BTreeSet<u32>,
}

/// Postings of a single trigram: subject → display name → entry.
///
/// The nested layout lets lookups borrow `&K` / `&str` and only allocate on
/// first sighting of a (subject, display name) pair.
#[derive(Debug)]
struct Bucket<K> {
    postings: Mutex<FxHashMap<K, FxHashMap<String, PostingEntry>>>,
}

impl<K> Default for Bucket<K> {
    fn default() -> Self {
        Self {
            postings: Mutex::new(FxHashMap::default()),
        }
    }
}

impl<K: SubjectKey> Bucket<K> {
    fn insert(&self, subject: &K, display_name: &str, normalized: &str, position: u32) -> bool {
        let mut postings = self.postings.lock();
        if let Some(by_name) = postings.get_mut(subject) {
            return insert_position(by_name, display_name, normalized, position);
        }
        let by_name = postings.entry(subject.clone()).or_default();
        insert_position(by_name, display_name, normalized, position)
    }

    fn snapshot(&self) -> Vec<Posting<K>> {
        let postings = self.postings.lock();
        let mut out: Vec<Posting<K>> = postings
            .iter()
            .flat_map(|(subject, by_name)| {
                by_name.iter().map(move |(display_name, entry)| Posting {
                    subject: subject.clone(),
                    display_name: display_name.clone(),
                    normalized: entry.normalized.clone(),
                    positions: entry.positions.iter().copied().collect(),
                })
            })
            .collect();
        drop(postings);

        out.sort_by(|a, b| {
            a.subject
                .cmp(&b.subject)
                .then_with(|| a.display_name.cmp(&b.display_name))
        });
        out
    }

    fn posting_count(&self) -> usize {
        self.postings.lock().values().map(FxHashMap::len).sum()
    }
}

fn insert_position(
    by_name: &mut FxHashMap<String, PostingEntry>,
    display_name: &str,
    normalized: &str,
    position: u32,
) -> bool {
    if let Some(entry) = by_name.get_mut(display_name) {
        return entry.positions.insert(position);
    }
    by_name.insert(
        display_name.to_string(),
        PostingEntry {
            normalized: normalized.to_string(),
            normalized_len: char_len(normalized),
            positions: BTreeSet::from([position]),
        },
    );
    true
}

/// Point-in-time copy of one posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Posting<K> {
    /// Subject the posting belongs to (card name or artist id).
    pub subject: K,
    /// Original display string returned to users.
    pub display_name: String,
    /// Normalized text stored with the posting, used for ranking.
    pub normalized: String,
    /// Char offsets at which the trigram occurred, ascending.
    pub positions: Vec<u32>,
}

/// Point-in-time copy of one trigram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSnapshot<K> {
    /// The bucket's trigram, as a 3-character string.
    pub trigram: String,
    /// Postings sorted by subject, then display name.
    pub postings: Vec<Posting<K>>,
}

/// Statistics for the trigram index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrigramStats {
    /// Number of distinct trigrams.
    pub trigram_count: usize,
    /// Number of postings across all buckets.
    pub posting_count: usize,
}

/// Trigram-based inverted index over subjects of type `K`.
///
/// Purely additive: entries accumulate until [`TrigramIndex::clear`].
/// Re-adding a subject only grows position sets.
#[derive(Debug)]
pub struct TrigramIndex<K> {
    buckets: DashMap<Trigram, Bucket<K>, FxBuildHasher>,
}

impl<K: SubjectKey> Default for TrigramIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SubjectKey> TrigramIndex<K> {
    /// Create a new empty trigram index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Number of distinct trigrams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Adds one subject's trigrams.
    ///
    /// For every `(trigram, position)` the bucket and the posting for
    /// `(subject, display_name)` are created on first sight; `normalized` is
    /// only recorded when the posting is created.
    pub fn add<I>(&self, subject: &K, display_name: &str, normalized: &str, trigrams: I)
    where
        I: IntoIterator<Item = (Trigram, u32)>,
    {
        for (trigram, position) in trigrams {
            self.bucket_or_insert(trigram)
                .insert(subject, display_name, normalized, position);
        }
    }

    fn bucket_or_insert(&self, trigram: Trigram) -> Ref<'_, Trigram, Bucket<K>, FxBuildHasher> {
        if let Some(bucket) = self.buckets.get(&trigram) {
            return bucket;
        }
        self.buckets.entry(trigram).or_default().downgrade()
    }

    /// Returns true if the trigram has a bucket.
    #[must_use]
    pub fn contains(&self, trigram: &Trigram) -> bool {
        self.buckets.contains_key(trigram)
    }

    /// Copies the postings of one bucket.
    #[must_use]
    pub fn bucket(&self, trigram: &Trigram) -> Option<Vec<Posting<K>>> {
        self.buckets.get(trigram).map(|bucket| bucket.snapshot())
    }

    /// Calls `f(subject, display_name, normalized_len)` for each posting of a
    /// bucket. Returns false when the trigram is not indexed.
    pub(crate) fn visit_bucket<F>(&self, trigram: &Trigram, mut f: F) -> bool
    where
        F: FnMut(&K, &str, usize),
    {
        let Some(bucket) = self.buckets.get(trigram) else {
            return false;
        };
        let postings = bucket.postings.lock();
        for (subject, by_name) in postings.iter() {
            for (display_name, entry) in by_name {
                f(subject, display_name, entry.normalized_len);
            }
        }
        true
    }

    /// Exports every bucket, sorted by trigram.
    ///
    /// Each bucket is copied under its own lock, so a bucket is internally
    /// consistent but concurrent writers may land between buckets.
    #[must_use]
    pub fn buckets(&self) -> Vec<BucketSnapshot<K>> {
        let mut out: Vec<(Trigram, Vec<Posting<K>>)> = self
            .buckets
            .iter()
            .map(|bucket| (*bucket.key(), bucket.value().snapshot()))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        out.into_iter()
            .map(|(trigram, postings)| BucketSnapshot {
                trigram: trigram_to_string(&trigram),
                postings,
            })
            .collect()
    }

    /// Get index statistics.
    #[must_use]
    pub fn stats(&self) -> TrigramStats {
        TrigramStats {
            trigram_count: self.buckets.len(),
            posting_count: self
                .buckets
                .iter()
                .map(|bucket| bucket.value().posting_count())
                .sum(),
        }
    }

    /// Empties all buckets.
    pub fn clear(&self) {
        self.buckets.clear();
    }
}
