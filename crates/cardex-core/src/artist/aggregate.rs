//! Per-artist accumulator with versioned dirty tracking.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use serde::Serialize;

/// Mutable state of one artist, always accessed under the aggregate's lock.
#[derive(Debug, Default)]
struct ArtistState {
    names: BTreeSet<String>,
    card_ids: BTreeSet<String>,
    set_ids: BTreeSet<String>,
    /// Bumped once per effective mutation.
    version: u64,
    /// Version last confirmed persisted.
    clean_version: u64,
}

impl ArtistState {
    fn insert(set: &mut BTreeSet<String>, version: &mut u64, value: &str) -> bool {
        if value.trim().is_empty() || set.contains(value) {
            return false;
        }
        set.insert(value.to_string());
        *version += 1;
        true
    }

    fn is_dirty(&self) -> bool {
        self.version != self.clean_version
    }
}

/// Point-in-time view of an [`ArtistAggregate`], handed to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSnapshot {
    /// Catalog artist id.
    pub artist_id: String,
    /// Every observed spelling of the artist's name, sorted.
    pub names: Vec<String>,
    /// Ids of cards credited to the artist, sorted.
    pub card_ids: Vec<String>,
    /// Ids of sets the artist appears in, sorted.
    pub set_ids: Vec<String>,
    /// Whether the aggregate had unpersisted changes when copied.
    pub dirty: bool,
    /// Aggregate version the snapshot was taken at.
    pub version: u64,
}

/// Accumulates every observation of one artist id.
///
/// All three sets and the dirty state live behind a single short-held
/// mutex, so concurrent ingestion workers serialize per artist only.
///
/// # Dirty tracking
///
/// The aggregate is dirty while its `version` differs from the last version
/// marked clean. Re-adding a value that is already present does not bump the
/// version, so it never dirties a clean aggregate.
#[derive(Debug)]
pub struct ArtistAggregate {
    artist_id: String,
    state: Mutex<ArtistState>,
}

impl ArtistAggregate {
    /// Creates an empty, clean aggregate.
    #[must_use]
    pub fn new(artist_id: impl Into<String>) -> Self {
        Self {
            artist_id: artist_id.into(),
            state: Mutex::new(ArtistState::default()),
        }
    }

    /// Catalog artist id.
    #[must_use]
    pub fn artist_id(&self) -> &str {
        &self.artist_id
    }

    /// Records a name variant. Blank input is ignored.
    ///
    /// Returns true if the name was new (and the aggregate is now dirty).
    pub fn add_name(&self, name: &str) -> bool {
        let mut state = self.state.lock();
        let ArtistState { names, version, .. } = &mut *state;
        ArtistState::insert(names, version, name)
    }

    /// Records a card credited to the artist. Blank input is ignored.
    pub fn add_card(&self, card_id: &str) -> bool {
        let mut state = self.state.lock();
        let ArtistState {
            card_ids, version, ..
        } = &mut *state;
        ArtistState::insert(card_ids, version, card_id)
    }

    /// Records a set the artist appears in. Blank input is ignored.
    pub fn add_set(&self, set_id: &str) -> bool {
        let mut state = self.state.lock();
        let ArtistState {
            set_ids, version, ..
        } = &mut *state;
        ArtistState::insert(set_ids, version, set_id)
    }

    /// Applies `add_name`, `add_card` and `add_set` under one lock.
    ///
    /// Returns true if any of the three changed the aggregate.
    pub fn observe(&self, name: &str, card_id: &str, set_id: &str) -> bool {
        let mut state = self.state.lock();
        let ArtistState {
            names,
            card_ids,
            set_ids,
            version,
            ..
        } = &mut *state;
        let name_added = ArtistState::insert(names, version, name);
        let card_added = ArtistState::insert(card_ids, version, card_id);
        let set_added = ArtistState::insert(set_ids, version, set_id);
        name_added || card_added || set_added
    }

    /// Whether the aggregate has changes not yet marked clean.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().is_dirty()
    }

    /// Current version. Starts at 0 and grows by one per effective change.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.lock().version
    }

    /// Clears the dirty flag unconditionally.
    pub fn mark_clean(&self) {
        let mut state = self.state.lock();
        state.clean_version = state.version;
    }

    /// Clears the dirty flag only if nothing changed since `version` was
    /// observed (typically from an [`ArtistSnapshot`]).
    ///
    /// Returns false, leaving the aggregate dirty, when a write landed after
    /// the snapshot.
    pub fn mark_clean_if_unchanged(&self, version: u64) -> bool {
        let mut state = self.state.lock();
        if state.version != version {
            return false;
        }
        state.clean_version = version;
        true
    }

    /// Copies the aggregate's current state.
    #[must_use]
    pub fn snapshot(&self) -> ArtistSnapshot {
        let state = self.state.lock();
        ArtistSnapshot {
            artist_id: self.artist_id.clone(),
            names: state.names.iter().cloned().collect(),
            card_ids: state.card_ids.iter().cloned().collect(),
            set_ids: state.set_ids.iter().cloned().collect(),
            dirty: state.is_dirty(),
            version: state.version,
        }
    }

    /// Copies the observed name variants.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.state.lock().names.iter().cloned().collect()
    }
}
