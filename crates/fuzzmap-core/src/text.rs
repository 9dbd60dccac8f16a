//! Term splitting and normalization
//!
//! Labels and queries are split on runs of whitespace, commas and periods.
//! Each term is then folded to the `a-z` alphabet the encoder understands.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Returns true for characters that separate terms
#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '.'
}

/// Split text into its raw, non-empty terms.
pub fn split_terms(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_separator).filter(|t| !t.is_empty())
}

/// Normalize a term: lowercase, strip diacritics, drop everything but `a-z`.
///
/// The result may be empty (e.g. for `"123"` or `"--"`); such terms are not
/// indexed and not searched.
pub fn normalize(term: &str) -> String {
    term.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Split and normalize in one pass, skipping terms that normalize to nothing.
pub fn normalized_terms(text: &str) -> Vec<String> {
    split_terms(text)
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}
