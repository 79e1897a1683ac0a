//! Text normalization and trigram generation.
//!
//! Every string the engine indexes or queries goes through [`normalize`]
//! first: Unicode-aware lowercasing, then every non-alphabetic character is
//! dropped. Letters with diacritics are letters and survive
//! (`"Jötun-Smith 2!"` → `"jötunsmith"`).
//!
//! [`trigrams`] then walks the normalized text one `char` at a time. Unlike
//! the `pg_trgm` style there is no padding: a string shorter than
//! [`MIN_TRIGRAM_LEN`] characters yields nothing and is therefore not
//! reachable by trigram search.

use std::str::Chars;

/// Minimum normalized length that produces at least one trigram.
pub const MIN_TRIGRAM_LEN: usize = 3;

/// Trigram type: 3 consecutive characters of a normalized string.
pub type Trigram = [char; 3];

/// Lowercases `text` and keeps only alphabetic characters.
///
/// Total function: empty or letter-free input yields an empty string.
///
/// # Example
///
/// ```
/// use cardex_core::text::normalize;
///
/// assert_eq!(normalize("Lightning Bolt"), "lightningbolt");
/// assert_eq!(normalize("Jötun-Smith 2!"), "jötunsmith");
/// assert_eq!(normalize("1-2-3"), "");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_alphabetic() {
            out.push(c);
        }
    }
    out
}

/// Number of characters in a normalized string.
#[must_use]
pub fn char_len(normalized: &str) -> usize {
    normalized.chars().count()
}

/// Renders a trigram as a 3-character string.
#[must_use]
pub fn trigram_to_string(trigram: &Trigram) -> String {
    trigram.iter().collect()
}

/// Yields every `(trigram, char offset)` of an already-normalized string.
///
/// The iterator is lazy and borrows `normalized`; clone it (or call
/// `trigrams` again) to walk the sequence more than once.
///
/// # Example
///
/// ```
/// use cardex_core::text::trigrams;
///
/// let grams: Vec<_> = trigrams("cats").collect();
/// assert_eq!(grams, vec![(['c', 'a', 't'], 0), (['a', 't', 's'], 1)]);
/// assert_eq!(trigrams("ab").count(), 0);
/// ```
#[must_use]
pub fn trigrams(normalized: &str) -> Trigrams<'_> {
    Trigrams {
        rest: normalized.chars(),
        position: 0,
    }
}

/// Iterator returned by [`trigrams`].
#[derive(Debug, Clone)]
pub struct Trigrams<'a> {
    rest: Chars<'a>,
    position: u32,
}

impl Iterator for Trigrams<'_> {
    type Item = (Trigram, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let mut window = self.rest.clone();
        let trigram = [window.next()?, window.next()?, window.next()?];
        let position = self.position;

        self.rest.next();
        self.position += 1;
        Some((trigram, position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // Chars only knows byte bounds: at most one char per byte.
        let (_, upper) = self.rest.size_hint();
        (0, upper.map(|n| n.saturating_sub(MIN_TRIGRAM_LEN - 1)))
    }
}

impl std::iter::FusedIterator for Trigrams<'_> {}
