//! Trigram Index for approximate name search.
//!
//! Maps each trigram of a normalized name to the postings that contain it:
//!
//! ```text
//! "lig" → { ("Lightning Bolt", "Lightning Bolt") @ {0},
//!           ("Lightning Strike", "Lightning Strike") @ {0} }
//! ```
//!
//! A posting is identified by `(subject, display name)`. The subject is the
//! key callers resolve results by (a card name, an artist id); the display
//! name is the original string users see. Seeing the same trigram again at a
//! new offset grows the posting's position set instead of adding a posting.

mod index;

pub use index::{BucketSnapshot, Posting, SubjectKey, TrigramIndex, TrigramStats};
