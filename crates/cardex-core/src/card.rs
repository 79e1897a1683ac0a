//! Strongly typed catalog records consumed by the engine.
//!
//! Parsing raw catalog JSON is the job of the ingestion client; it produces
//! these types (directly through `serde` or by mapping its own DTOs).

use serde::{Deserialize, Serialize};

/// One artist credit on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    /// Catalog artist id.
    pub id: String,
    /// Artist name as printed on this card.
    pub name: String,
}

impl ArtistCredit {
    /// Creates a credit.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A normalized catalog card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    /// Catalog card id (one per printing).
    pub id: String,
    /// Card name; shared by every printing of the card.
    pub name: String,
    /// Alternate in-universe name, searchable as an alias of `name`.
    #[serde(default)]
    pub flavor_name: Option<String>,
    /// Id of the set this printing belongs to.
    #[serde(default)]
    pub set_id: String,
    /// Artists credited on the card; a card may list several.
    #[serde(default)]
    pub artists: Vec<ArtistCredit>,
}

impl CardRecord {
    /// Creates a card with no flavor name and no artists.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, set_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flavor_name: None,
            set_id: set_id.into(),
            artists: Vec::new(),
        }
    }

    /// Sets the flavor name.
    #[must_use]
    pub fn with_flavor_name(mut self, flavor_name: impl Into<String>) -> Self {
        self.flavor_name = Some(flavor_name.into());
        self
    }

    /// Adds an artist credit.
    #[must_use]
    pub fn with_artist(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.artists.push(ArtistCredit::new(id, name));
        self
    }

    /// Flavor name, if present and not blank.
    #[must_use]
    pub fn flavor_alias(&self) -> Option<&str> {
        self.flavor_name
            .as_deref()
            .filter(|flavor| !flavor.trim().is_empty())
    }
}
