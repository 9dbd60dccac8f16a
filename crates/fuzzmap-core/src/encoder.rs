//! String to number encoding
//!
//! A normalized term is mapped into `[0, max_distance]` by recursive interval
//! subdivision: every character narrows the current interval to one of 26
//! equal sub-intervals, picked by the character's rank in the active
//! [`Distribution`]. The final number is the midpoint of the last interval.
//!
//! Terms sharing a longer prefix end up in the same nested sub-interval, so
//! their numbers are closer. Each later character contributes 26 times less
//! than the one before it.
//!
//! A second, independent number is produced by encoding the characters in a
//! different order ([`SecondaryAxis`]); by default the term is read backward,
//! which makes that number sensitive to suffix similarity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of letters in the encoding alphabet
pub const ALPHABET_SIZE: usize = 26;

const ASCII_ORDER: &[u8; ALPHABET_SIZE] = b"abcdefghijklmnopqrstuvwxyz";
const QWERTY_ORDER: &[u8; ALPHABET_SIZE] = b"qazwsxedcrfvtgbyhnujmikolp";

/// Letter ordering used as the base of the encoding.
///
/// Changes which letters are numerically close, not the algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Distribution {
    /// Plain alphabetical order
    Ascii,
    /// Keyboard columns, so that adjacent keys get adjacent ranks
    #[default]
    Qwerty,
}

impl Distribution {
    /// Lenient lookup: unknown names fall back to the default preset.
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            tracing::warn!(name, "unknown distribution, falling back to QWERTY");
            Distribution::default()
        })
    }

    /// Canonical preset name
    pub fn name(self) -> &'static str {
        match self {
            Distribution::Ascii => "ASCII",
            Distribution::Qwerty => "QWERTY",
        }
    }

    fn order(self) -> &'static [u8; ALPHABET_SIZE] {
        match self {
            Distribution::Ascii => ASCII_ORDER,
            Distribution::Qwerty => QWERTY_ORDER,
        }
    }

    /// Build the letter -> rank (1..=26) lookup table for this preset
    fn rank_table(self) -> [u8; ALPHABET_SIZE] {
        let mut table = [0u8; ALPHABET_SIZE];
        for (i, letter) in self.order().iter().enumerate() {
            table[(letter - b'a') as usize] = (i + 1) as u8;
        }
        table
    }
}

impl FromStr for Distribution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASCII" => Ok(Distribution::Ascii),
            "QWERTY" => Ok(Distribution::Qwerty),
            _ => Err(ConfigError::UnknownDistribution(s.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Distribution {
    fn from(name: String) -> Self {
        Distribution::from_name(&name)
    }
}

impl From<Distribution> for String {
    fn from(distribution: Distribution) -> Self {
        distribution.name().to_string()
    }
}

/// Character order used to build the second index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryAxis {
    /// Read the term right to left (suffix similarity)
    #[default]
    Reversed,
    /// Middle character first, then alternate left and right outward
    MiddleOut,
}

/// Deterministic term -> number encoder
#[derive(Debug, Clone)]
pub struct Encoder {
    ranks: [u8; ALPHABET_SIZE],
    distribution: Distribution,
    max_distance: f64,
}

impl Encoder {
    pub fn new(distribution: Distribution, max_distance: f64) -> Self {
        Self {
            ranks: distribution.rank_table(),
            distribution,
            max_distance,
        }
    }

    pub fn distribution(&self) -> Distribution {
        self.distribution
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Rank of a letter in the active distribution, `None` outside `a-z`
    #[inline]
    pub fn rank(&self, c: char) -> Option<u8> {
        if c.is_ascii_lowercase() {
            Some(self.ranks[(c as u8 - b'a') as usize])
        } else {
            None
        }
    }

    /// Encode characters in the order given.
    ///
    /// Characters without a rank are skipped; an empty sequence encodes to
    /// the midpoint of the full range.
    pub fn encode_chars<I>(&self, chars: I) -> f64
    where
        I: IntoIterator<Item = char>,
    {
        let buckets = ALPHABET_SIZE as f64;
        let mut min = 0.0f64;
        let mut max = self.max_distance;

        for rank in chars.into_iter().filter_map(|c| self.rank(c)) {
            let width = (max - min) / buckets;
            let rank = f64::from(rank);
            max = min + rank * width;
            min += (rank - 1.0) * width;
        }

        (min + max) / 2.0
    }

    /// Forward (left to right) encoding, sensitive to shared prefixes
    pub fn encode_ltr(&self, term: &str) -> f64 {
        self.encode_chars(term.chars())
    }

    /// Backward (right to left) encoding, sensitive to shared suffixes
    pub fn encode_rtl(&self, term: &str) -> f64 {
        self.encode_chars(term.chars().rev())
    }

    /// Middle-outward encoding, sensitive to a shared core
    pub fn encode_middle_out(&self, term: &str) -> f64 {
        self.encode_chars(middle_out(term))
    }

    /// Encode for the selected secondary axis
    pub fn encode_secondary(&self, term: &str, axis: SecondaryAxis) -> f64 {
        match axis {
            SecondaryAxis::Reversed => self.encode_rtl(term),
            SecondaryAxis::MiddleOut => self.encode_middle_out(term),
        }
    }
}

/// Reorder characters starting at the middle, alternating left then right.
///
/// `"abcde"` becomes `"cbdae"`.
fn middle_out(term: &str) -> Vec<char> {
    let chars: Vec<char> = term.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    if chars.is_empty() {
        return out;
    }

    let mid = chars.len() / 2;
    out.push(chars[mid]);
    for step in 1..=mid.max(chars.len() - mid) {
        if let Some(left) = mid.checked_sub(step) {
            out.push(chars[left]);
        }
        if let Some(&right) = chars.get(mid + step) {
            out.push(right);
        }
    }
    out
}
