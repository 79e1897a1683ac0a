//! Concurrent artist id → aggregate registry.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use super::aggregate::ArtistAggregate;

/// Registry of [`ArtistAggregate`]s keyed by artist id.
///
/// Aggregates are handed out as `Arc`s so mutation happens under the
/// aggregate's own lock, after the map shard lock is released.
#[derive(Debug)]
pub struct ArtistRegistry {
    artists: DashMap<String, Arc<ArtistAggregate>, FxBuildHasher>,
}

impl Default for ArtistRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtistRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            artists: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Returns the aggregate for `artist_id`, creating it if absent.
    ///
    /// Concurrent callers with the same id always receive the same aggregate.
    pub fn get_or_create(&self, artist_id: &str) -> Arc<ArtistAggregate> {
        if let Some(existing) = self.artists.get(artist_id) {
            return Arc::clone(existing.value());
        }
        let entry = self
            .artists
            .entry(artist_id.to_string())
            .or_insert_with(|| Arc::new(ArtistAggregate::new(artist_id)));
        Arc::clone(entry.value())
    }

    /// Looks up an aggregate without creating it.
    #[must_use]
    pub fn get(&self, artist_id: &str) -> Option<Arc<ArtistAggregate>> {
        self.artists.get(artist_id).map(|entry| Arc::clone(entry.value()))
    }

    /// All aggregates, sorted by artist id.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<ArtistAggregate>> {
        let mut artists: Vec<Arc<ArtistAggregate>> = self
            .artists
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        artists.sort_unstable_by(|a, b| a.artist_id().cmp(b.artist_id()));
        artists
    }

    /// Aggregates that are currently dirty, sorted by artist id.
    #[must_use]
    pub fn dirty(&self) -> Vec<Arc<ArtistAggregate>> {
        let mut artists = self.all();
        artists.retain(|artist| artist.is_dirty());
        artists
    }

    /// Clears the dirty flag of every aggregate unconditionally.
    pub fn mark_all_clean(&self) {
        for entry in &self.artists {
            entry.value().mark_clean();
        }
    }

    /// Number of aggregates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artists.len()
    }

    /// Returns true if no artist has been observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }

    /// Drops every aggregate.
    pub fn clear(&self) {
        self.artists.clear();
    }
}
