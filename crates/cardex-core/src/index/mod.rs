//! In-memory approximate-string indexes.

pub mod trigram;

pub use trigram::{BucketSnapshot, Posting, TrigramIndex, TrigramStats};
