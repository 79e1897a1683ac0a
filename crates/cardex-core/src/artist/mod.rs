//! Artist identity aggregation.
//!
//! The catalog repeats each artist across many printings, often with
//! spelling or casing variants. Every `(artist id, name, card, set)`
//! observation folds into one [`ArtistAggregate`] per artist id.

mod aggregate;
mod registry;

pub use aggregate::{ArtistAggregate, ArtistSnapshot};
pub use registry::ArtistRegistry;

#[cfg(test)]
mod tests;
