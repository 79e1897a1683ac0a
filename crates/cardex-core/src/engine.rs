//! Aggregation engine: ingestion entry point and query surface.
//!
//! One engine is built at process start and shared by reference (or `Arc`)
//! with every ingestion worker and query handler. It owns:
//!
//! - the artist registry (artist id → [`ArtistAggregate`]),
//! - the card-name trigram index (subject = card name),
//! - the artist-name trigram index (subject = artist id).
//!
//! # Data flow
//!
//! ```text
//! worker ──track(card)──► card-name index
//!                    └──► artist aggregates ──refresh / flush──► artist-name index
//! ```
//!
//! The artist-name index is derived from aggregates in a separate pass
//! ([`AggregationEngine::refresh_artist_name_index`], run by
//! [`AggregationEngine::flush_dirty`]) or rebuilt from scratch with
//! [`AggregationEngine::rebuild_artist_name_index`].
//!
//! # Flush protocol
//!
//! [`AggregationEngine::flush_dirty`] snapshots dirty aggregates, hands them
//! to the caller's persistence closure and then clears each aggregate only if
//! its version still matches the snapshot. A `track` landing mid-flush keeps
//! its aggregate dirty for the next cycle; no update is lost.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::artist::{ArtistAggregate, ArtistRegistry, ArtistSnapshot};
use crate::card::CardRecord;
use crate::config::CardexConfig;
use crate::error::{Error, Result};
use crate::export::{ArtistNameTrigram, CardNameTrigram};
use crate::index::TrigramIndex;
use crate::search::{distinct_keys, search};
use crate::text::{char_len, normalize, trigrams, MIN_TRIGRAM_LEN};

/// Outcome of [`AggregationEngine::flush_dirty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Aggregates handed to the persistence closure.
    pub flushed: usize,
    /// Aggregates marked clean afterwards.
    pub cleaned: usize,
    /// Aggregates written to while the flush ran; still dirty.
    pub still_dirty: usize,
}

/// Engine-wide counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    /// Number of `track` calls since creation or the last `clear`.
    pub cards_tracked: u64,
    /// Number of artist aggregates.
    pub artist_count: usize,
    /// Number of dirty artist aggregates.
    pub dirty_artist_count: usize,
    /// Distinct trigrams in the card-name index.
    pub card_trigram_count: usize,
    /// Distinct trigrams in the artist-name index.
    pub artist_trigram_count: usize,
}

/// Card/artist indexing and aggregation engine.
#[derive(Debug)]
pub struct AggregationEngine {
    config: CardexConfig,
    artists: ArtistRegistry,
    card_names: TrigramIndex<String>,
    artist_names: TrigramIndex<String>,
    cards_tracked: AtomicU64,
    log_level: LevelFilter,
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregationEngine {
    /// Creates an empty engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(CardexConfig::default())
    }

    /// Creates an empty engine with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn with_config(config: CardexConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: CardexConfig) -> Self {
        let log_level = config.logging.level_filter().unwrap_or(LevelFilter::INFO);
        Self {
            config,
            log_level,
            artists: ArtistRegistry::new(),
            card_names: TrigramIndex::new(),
            artist_names: TrigramIndex::new(),
            cards_tracked: AtomicU64::new(0),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &CardexConfig {
        &self.config
    }

    /// Most verbose level the engine emits events at.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    fn logs(&self, level: Level) -> bool {
        level <= self.log_level
    }

    // ------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------

    /// Ingests one card: artist aggregates and card-name index.
    ///
    /// Idempotent; a partially applied card is repaired by tracking it again.
    pub fn track(&self, card: &CardRecord) {
        self.track_artists(card);
        self.track_card_name(card);
        self.cards_tracked.fetch_add(1, Ordering::Relaxed);
    }

    /// Ingests a batch of cards in parallel on the rayon pool.
    pub fn track_all(&self, cards: &[CardRecord]) {
        cards.par_iter().for_each(|card| self.track(card));
    }

    /// Folds every artist credit of `card` into its aggregate.
    ///
    /// Credits with a blank artist id are skipped.
    pub fn track_artists(&self, card: &CardRecord) {
        for credit in &card.artists {
            if credit.id.trim().is_empty() {
                if self.logs(Level::TRACE) {
                    tracing::trace!(card_id = %card.id, "Skipping artist credit without id");
                }
                continue;
            }
            self.artists
                .get_or_create(&credit.id)
                .observe(&credit.name, &card.id, &card.set_id);
        }
    }

    /// Indexes the card name, and its flavor name as an alias.
    ///
    /// Both contribute postings keyed and displayed by the real card name and
    /// carrying the real name's normalization; only the trigrams of the
    /// flavor alias come from the flavor text.
    pub fn track_card_name(&self, card: &CardRecord) {
        let name = &card.name;
        if name.trim().is_empty() {
            if self.logs(Level::TRACE) {
                tracing::trace!(card_id = %card.id, "Skipping card without name");
            }
            return;
        }

        let normalized = normalize(name);
        if char_len(&normalized) >= MIN_TRIGRAM_LEN {
            self.card_names
                .add(name, name, &normalized, trigrams(&normalized));
        }

        if !self.config.index.index_flavor_names {
            return;
        }
        if let Some(flavor) = card.flavor_alias() {
            let flavor_normalized = normalize(flavor);
            if char_len(&flavor_normalized) >= MIN_TRIGRAM_LEN {
                self.card_names
                    .add(name, name, &normalized, trigrams(&flavor_normalized));
            }
        }
    }

    /// Indexes name variants of one artist in the artist-name index.
    ///
    /// Names normalizing to fewer than three letters are skipped. Returns the
    /// number of names indexed.
    pub fn track_artist_names<S: AsRef<str>>(&self, artist_id: &str, names: &[S]) -> usize {
        let subject = artist_id.to_string();
        let mut indexed = 0;
        for name in names {
            let name = name.as_ref();
            let normalized = normalize(name);
            if char_len(&normalized) < MIN_TRIGRAM_LEN {
                if self.logs(Level::TRACE) {
                    tracing::trace!(artist_id, name, "Artist name too short to index");
                }
                continue;
            }
            self.artist_names
                .add(&subject, name, &normalized, trigrams(&normalized));
            indexed += 1;
        }
        indexed
    }

    fn index_snapshot_names(&self, snapshots: &[ArtistSnapshot]) {
        for snapshot in snapshots {
            self.track_artist_names(&snapshot.artist_id, &snapshot.names);
        }
    }

    /// Indexes the names of every dirty aggregate. Returns the number of
    /// aggregates visited.
    pub fn refresh_artist_name_index(&self) -> usize {
        let snapshots = self.get_dirty_artists();
        self.index_snapshot_names(&snapshots);
        if self.logs(Level::DEBUG) {
            tracing::debug!(artists = snapshots.len(), "Artist-name index refreshed");
        }
        snapshots.len()
    }

    /// Rebuilds the artist-name index from every aggregate.
    ///
    /// Must not run concurrently with queries that expect a complete index.
    pub fn rebuild_artist_name_index(&self) -> usize {
        self.artist_names.clear();
        let snapshots = self.get_artists();
        self.index_snapshot_names(&snapshots);
        if self.logs(Level::DEBUG) {
            tracing::debug!(artists = snapshots.len(), "Artist-name index rebuilt");
        }
        snapshots.len()
    }

    // ------------------------------------------------------------------
    // Aggregates
    // ------------------------------------------------------------------

    /// Snapshots of every aggregate, sorted by artist id.
    #[must_use]
    pub fn get_artists(&self) -> Vec<ArtistSnapshot> {
        self.artists.all().iter().map(|a| a.snapshot()).collect()
    }

    /// Snapshots of dirty aggregates, sorted by artist id.
    #[must_use]
    pub fn get_dirty_artists(&self) -> Vec<ArtistSnapshot> {
        self.artists
            .all()
            .iter()
            .map(|a| a.snapshot())
            .filter(|snapshot| snapshot.dirty)
            .collect()
    }

    /// Snapshot of one aggregate.
    #[must_use]
    pub fn artist(&self, artist_id: &str) -> Option<ArtistSnapshot> {
        self.artists.get(artist_id).map(|a| a.snapshot())
    }

    /// Indexes the names of dirty aggregates, then clears every dirty flag
    /// unconditionally.
    ///
    /// Only safe after a successful flush with no concurrent `track`;
    /// prefer [`AggregationEngine::flush_dirty`].
    pub fn mark_all_clean(&self) {
        self.refresh_artist_name_index();
        self.artists.mark_all_clean();
    }

    /// Persists dirty aggregates through `persist`, then marks them clean.
    ///
    /// Names of the flushed snapshots are indexed in the artist-name index
    /// before `persist` runs. An aggregate is cleaned only if no write
    /// landed after its snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persistence`] if `persist` fails; nothing is cleaned.
    pub fn flush_dirty<F, E>(&self, persist: F) -> Result<FlushReport>
    where
        F: FnOnce(&[ArtistSnapshot]) -> std::result::Result<(), E>,
        E: std::fmt::Display,
    {
        let dirty: Vec<Arc<ArtistAggregate>> = self.artists.dirty();
        let snapshots: Vec<ArtistSnapshot> = dirty.iter().map(|a| a.snapshot()).collect();
        if snapshots.is_empty() {
            return Ok(FlushReport::default());
        }

        self.index_snapshot_names(&snapshots);

        if let Err(err) = persist(&snapshots) {
            if self.logs(Level::WARN) {
                tracing::warn!(artists = snapshots.len(), error = %err, "Artist flush failed");
            }
            return Err(Error::Persistence(err.to_string()));
        }

        let cleaned = dirty
            .iter()
            .zip(&snapshots)
            .map(|(artist, snapshot)| artist.mark_clean_if_unchanged(snapshot.version))
            .filter(|cleaned| *cleaned)
            .count();
        let report = FlushReport {
            flushed: snapshots.len(),
            cleaned,
            still_dirty: snapshots.len() - cleaned,
        };
        if self.logs(Level::INFO) {
            tracing::info!(
                flushed = report.flushed,
                cleaned = report.cleaned,
                still_dirty = report.still_dirty,
                "Artist aggregates flushed"
            );
        }
        Ok(report)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Exports the card-name index, sorted by trigram.
    #[must_use]
    pub fn export_card_name_trigrams(&self) -> Vec<CardNameTrigram> {
        self.card_names
            .buckets()
            .into_iter()
            .map(CardNameTrigram::from)
            .collect()
    }

    /// Exports the artist-name index, sorted by trigram.
    #[must_use]
    pub fn export_artist_trigrams(&self) -> Vec<ArtistNameTrigram> {
        self.artist_names
            .buckets()
            .into_iter()
            .map(ArtistNameTrigram::from)
            .collect()
    }

    /// Card-name index, for direct inspection.
    #[must_use]
    pub fn card_name_index(&self) -> &TrigramIndex<String> {
        &self.card_names
    }

    /// Artist-name index, for direct inspection.
    #[must_use]
    pub fn artist_name_index(&self) -> &TrigramIndex<String> {
        &self.artist_names
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Ranked card names matching `term`, at most `search.max_results` of
    /// them. Use [`search`] on [`AggregationEngine::card_name_index`] for the
    /// uncapped list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermTooShort`] below the configured minimum length.
    pub fn search_card_names(&self, term: &str) -> Result<Vec<String>> {
        let hits = search(term, &self.card_names, self.config.search.min_term_length)?;
        Ok(distinct_keys(hits, self.config.search.max_results))
    }

    /// Ranked artist ids whose name variants match `term`, at most
    /// `search.max_results` of them. Use [`search`] on
    /// [`AggregationEngine::artist_name_index`] for the uncapped list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TermTooShort`] below the configured minimum length.
    pub fn search_artist_names(&self, term: &str) -> Result<Vec<String>> {
        let hits = search(term, &self.artist_names, self.config.search.min_term_length)?;
        Ok(distinct_keys(hits, self.config.search.max_results))
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Engine-wide counters.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            cards_tracked: self.cards_tracked.load(Ordering::Relaxed),
            artist_count: self.artists.len(),
            dirty_artist_count: self.artists.dirty().len(),
            card_trigram_count: self.card_names.len(),
            artist_trigram_count: self.artist_names.len(),
        }
    }

    /// Resets the engine to its empty state.
    ///
    /// Callers must ensure no `track` or query is in flight.
    pub fn clear(&self) {
        self.artists.clear();
        self.card_names.clear();
        self.artist_names.clear();
        self.cards_tracked.store(0, Ordering::Relaxed);
        if self.logs(Level::DEBUG) {
            tracing::debug!("Aggregation engine cleared");
        }
    }
}
