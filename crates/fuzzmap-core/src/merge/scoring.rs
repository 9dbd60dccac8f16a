//! Final scoring laws
//!
//! Every law produces a non-negative score where lower is better.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Penalty per missing term match and per unit of word-count mismatch
pub const TERM_MISMATCH_PENALTY: f64 = 0.2;

/// How merged results are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Euclidean distance between `[d1, .., dn, term_count]` and `[0, .., 0, n]`
    #[default]
    VectorDistance,
    /// Average matched distance plus fixed penalties for partial coverage
    /// and word-count mismatch
    PenalizedAverage,
    /// Levenshtein distance between the normalized query and label
    EditDistance,
}

impl FromStr for Ranking {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "vector_distance" | "vector" => Ok(Ranking::VectorDistance),
            "penalized_average" | "average" => Ok(Ranking::PenalizedAverage),
            "edit_distance" | "levenshtein" => Ok(Ranking::EditDistance),
            _ => Err(ConfigError::UnknownRanking(s.to_string())),
        }
    }
}

/// What the index remembers about a value, independent of any query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueProfile {
    /// Number of indexed terms in the value's label
    pub term_count: usize,
    /// Normalized terms of the label joined by single spaces
    pub normalized: String,
}

impl ValueProfile {
    pub fn from_terms(terms: &[String]) -> Self {
        Self {
            term_count: terms.len(),
            normalized: terms.join(" "),
        }
    }
}

/// Euclidean distance between two vectors; missing components count as zero.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0.0);
            let y = b.get(i).copied().unwrap_or(0.0);
            (x - y).powi(2)
        })
        .sum::<f64>()
        .sqrt()
}

/// Law (a): the distance vector extended with the value's term count,
/// measured against the ideal vector of zeros extended with the step count.
pub(crate) fn vector_distance(distances: &[f64], steps: usize, term_count: usize) -> f64 {
    let squared: f64 = distances.iter().map(|d| d * d).sum();
    let words = term_count as f64 - steps as f64;
    (squared + words * words).sqrt()
}

/// Law (b)
pub(crate) fn penalized_average(
    average: f64,
    matches: usize,
    steps: usize,
    query_terms: usize,
    term_count: usize,
) -> f64 {
    average
        + TERM_MISMATCH_PENALTY * steps.abs_diff(matches) as f64
        + TERM_MISMATCH_PENALTY * query_terms.abs_diff(term_count) as f64
}

pub(crate) fn edit_distance(query: &str, label: &str) -> f64 {
    strsim::levenshtein(query, label) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_known_values() {
        assert_eq!(euclidean(&[3.0, 0.0], &[0.0, 4.0]), 5.0);
        assert_eq!(euclidean(&[1.0, 2.0], &[1.0, 2.0]), 0.0);
        assert_eq!(euclidean(&[3.0], &[0.0, 4.0]), 5.0);
    }

    #[test]
    fn test_vector_distance_matches_euclidean() {
        let distances = [1.5, 0.0, 2.0];
        let expected = euclidean(&[1.5, 0.0, 2.0, 2.0], &[0.0, 0.0, 0.0, 3.0]);
        assert!((vector_distance(&distances, 3, 2) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_vector_distance_perfect_match_is_zero() {
        assert_eq!(vector_distance(&[0.0, 0.0], 2, 2), 0.0);
    }

    #[test]
    fn test_penalized_average() {
        assert_eq!(penalized_average(0.0, 2, 2, 2, 2), 0.0);
        let score = penalized_average(1.0, 1, 2, 2, 3);
        assert!((score - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("john smith", "jon smyth"), 2.0);
        assert_eq!(edit_distance("abc", "abc"), 0.0);
    }

    #[test]
    fn test_ranking_names() {
        assert_eq!("vector".parse::<Ranking>().unwrap(), Ranking::VectorDistance);
        assert_eq!(
            "Penalized-Average".parse::<Ranking>().unwrap(),
            Ranking::PenalizedAverage
        );
        assert_eq!("levenshtein".parse::<Ranking>().unwrap(), Ranking::EditDistance);
        assert!("bm25".parse::<Ranking>().is_err());
    }

    #[test]
    fn test_profile_from_terms() {
        let profile = ValueProfile::from_terms(&["new".to_string(), "york".to_string()]);
        assert_eq!(profile.term_count, 2);
        assert_eq!(profile.normalized, "new york");
    }
}
