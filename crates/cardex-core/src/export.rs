//! Export records for the persistence collaborators.
//!
//! These are plain serializable views; the storage encoding belongs to the
//! caller.

use serde::Serialize;

use crate::index::BucketSnapshot;

/// One card-name posting inside an exported trigram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardNameEntry {
    /// Card name (the posting's display name).
    pub name: String,
    /// Normalized card name.
    pub normalized: String,
    /// Char offsets of the trigram.
    pub positions: Vec<u32>,
}

/// An exported card-name trigram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardNameTrigram {
    /// The trigram.
    pub trigram: String,
    /// Postings in the bucket.
    pub entries: Vec<CardNameEntry>,
}

/// One artist-name posting inside an exported trigram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistNameEntry {
    /// Artist id the name belongs to.
    pub artist_id: String,
    /// Name variant as observed.
    pub name: String,
    /// Normalized name variant.
    pub normalized: String,
    /// Char offsets of the trigram.
    pub positions: Vec<u32>,
}

/// An exported artist-name trigram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistNameTrigram {
    /// The trigram.
    pub trigram: String,
    /// Postings in the bucket.
    pub entries: Vec<ArtistNameEntry>,
}

impl From<BucketSnapshot<String>> for CardNameTrigram {
    fn from(bucket: BucketSnapshot<String>) -> Self {
        Self {
            trigram: bucket.trigram,
            entries: bucket
                .postings
                .into_iter()
                .map(|posting| CardNameEntry {
                    name: posting.display_name,
                    normalized: posting.normalized,
                    positions: posting.positions,
                })
                .collect(),
        }
    }
}

impl From<BucketSnapshot<String>> for ArtistNameTrigram {
    fn from(bucket: BucketSnapshot<String>) -> Self {
        Self {
            trigram: bucket.trigram,
            entries: bucket
                .postings
                .into_iter()
                .map(|posting| ArtistNameEntry {
                    artist_id: posting.subject,
                    name: posting.display_name,
                    normalized: posting.normalized,
                    positions: posting.positions,
                })
                .collect(),
        }
    }
}
