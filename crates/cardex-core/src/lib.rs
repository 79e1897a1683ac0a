//! # `Cardex` Core
//!
//! In-memory indexing and aggregation engine for card catalog feeds.
//!
//! The engine ingests a stream of normalized card records and answers two
//! kinds of query cheaply:
//!
//! - **Fuzzy name search**: which cards or artists have a name approximately
//!   matching a user-typed fragment (trigram index, [`index::TrigramIndex`]).
//! - **Artist identity**: every card, set and name variant observed for an
//!   artist id, de-duplicated across printings ([`artist::ArtistAggregate`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use cardex_core::{AggregationEngine, CardRecord};
//!
//! let engine = AggregationEngine::new();
//!
//! engine.track(&CardRecord::new("c1", "Lightning Bolt", "S1").with_artist("A1", "Jane Doe"));
//! engine.track(&CardRecord::new("c2", "Lightning Strike", "S1").with_artist("A1", "J. Doe"));
//!
//! let names = engine.search_card_names("light")?;
//! assert_eq!(names, vec!["Lightning Bolt", "Lightning Strike"]);
//!
//! let report = engine.flush_dirty(|dirty| {
//!     assert_eq!(dirty[0].names, vec!["J. Doe", "Jane Doe"]);
//!     Ok::<(), std::io::Error>(())
//! })?;
//! assert_eq!(report.cleaned, 1);
//! assert_eq!(engine.search_artist_names("doe")?, vec!["A1"]);
//! # Ok::<(), cardex_core::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

pub mod artist;
pub mod card;
pub mod config;
pub mod engine;
pub mod error;
#[cfg(test)]
mod error_tests;
pub mod export;
pub mod index;
pub mod search;
pub mod text;

pub use artist::{ArtistAggregate, ArtistRegistry, ArtistSnapshot};
pub use card::{ArtistCredit, CardRecord};
pub use config::{CardexConfig, ConfigError};
pub use engine::{AggregationEngine, EngineStats, FlushReport};
pub use error::{Error, Result};
pub use export::{ArtistNameEntry, ArtistNameTrigram, CardNameEntry, CardNameTrigram};
pub use index::{BucketSnapshot, Posting, TrigramIndex, TrigramStats};
pub use search::{search, SearchHit};
