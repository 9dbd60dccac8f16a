//! StringMap - fuzzy text index over two numeric axes
//!
//! Every term of a label is encoded twice: left to right into the primary
//! index and along the secondary axis (right to left by default) into the
//! second index. A query term is looked up in both; secondary-axis distances
//! are scaled by the penalty factor so that, at equal raw distance, a prefix
//! match always ranks ahead of a suffix match.
//!
//! # Example
//!
//! ```rust
//! use fuzzmap_core::StringMap;
//!
//! let mut map = StringMap::new();
//! map.insert("John Smith", 1);
//! map.insert("Jane Doe", 2);
//!
//! let hits = map.search("jon smith");
//! assert_eq!(hits[0].value, 1);
//! ```

use std::hash::Hash;
use std::time::Instant;

use ahash::AHashMap;
use tracing::{debug, trace};

use crate::config::{SearchOptions, StringMapConfig};
use crate::encoder::Encoder;
use crate::error::Result;
use crate::merge::{ResultMerger, SearchHit, ValueProfile};
use crate::numeric::{Candidate, NumericMap};
use crate::text;

/// Fuzzy label -> value index
#[derive(Debug, Clone)]
pub struct StringMap<V> {
    ltr: NumericMap<V>,
    rtl: NumericMap<V>,
    profiles: AHashMap<V, ValueProfile>,
    encoder: Encoder,
    config: StringMapConfig,
}

impl<V: Clone + Eq + Hash> Default for StringMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash> StringMap<V> {
    /// Create an empty index with the default configuration
    pub fn new() -> Self {
        Self::from_valid_config(StringMapConfig::default())
    }

    /// Create an empty index, rejecting an invalid configuration
    pub fn with_config(config: StringMapConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: StringMapConfig) -> Self {
        Self {
            ltr: NumericMap::new(),
            rtl: NumericMap::new(),
            profiles: AHashMap::new(),
            encoder: Encoder::new(config.distribution, config.max_distance),
            config,
        }
    }

    pub fn config(&self) -> &StringMapConfig {
        &self.config
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Primary (left to right) index
    pub fn ltr_index(&self) -> &NumericMap<V> {
        &self.ltr
    }

    /// Secondary-axis index
    pub fn rtl_index(&self) -> &NumericMap<V> {
        &self.rtl
    }

    /// Number of distinct values indexed
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Profile recorded for a value on its first insertion
    pub fn profile(&self, value: &V) -> Option<&ValueProfile> {
        self.profiles.get(value)
    }

    /// Associate `label` with `value`.
    ///
    /// Labels with no indexable term are ignored. Inserting the same pair
    /// again leaves the index unchanged.
    ///
    /// The value's [`ValueProfile`] comes from the first label it is
    /// inserted with. Later labels add search keys but do not change the
    /// term count or normalized text used for ranking.
    pub fn insert(&mut self, label: &str, value: V) {
        let terms = text::normalized_terms(label);
        if terms.is_empty() {
            trace!(label, "label has no indexable terms");
            return;
        }

        for term in &terms {
            let ltr_key = self.encoder.encode_ltr(term);
            let rtl_key = self
                .encoder
                .encode_secondary(term, self.config.secondary_axis);
            self.ltr.insert(ltr_key, value.clone());
            self.rtl.insert(rtl_key, value.clone());
        }

        debug!(terms = terms.len(), keys = self.ltr.len(), "indexed label");
        self.profiles
            .entry(value)
            .or_insert_with(|| ValueProfile::from_terms(&terms));
    }

    /// Search a multi-term query with the configured bounds
    pub fn search(&self, query: &str) -> Vec<SearchHit<V>> {
        self.search_with(query, SearchOptions::default())
    }

    /// Search a multi-term query.
    ///
    /// Each term is one merge step; values get one distance per term and are
    /// ranked by the configured law, best first.
    pub fn search_with(&self, query: &str, options: SearchOptions) -> Vec<SearchHit<V>> {
        let start = Instant::now();
        let (max_distance, max_results) = self.bounds(options);
        if max_results == 0 {
            return Vec::new();
        }

        let terms = text::normalized_terms(query);
        let mut merger = ResultMerger::new(self.config.max_distance);

        for term in &terms {
            let step = self.term_merger(term, max_distance, max_results);
            trace!(term = %term, candidates = step.len(), "term searched");
            merger.merge(step.into_step_candidates(), 1.0);
        }

        let mut hits = merger.into_ranked(self.config.ranking, &terms, |v| self.profiles.get(v));
        hits.truncate(max_results);

        debug!(
            terms = terms.len(),
            hits = hits.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );
        hits
    }

    /// Search a single term with the configured bounds
    pub fn search_term(&self, term: &str) -> Vec<SearchHit<V>> {
        self.search_term_with(term, SearchOptions::default())
    }

    /// Search a single term.
    ///
    /// A term that normalizes to nothing yields no results.
    pub fn search_term_with(&self, term: &str, options: SearchOptions) -> Vec<SearchHit<V>> {
        let (max_distance, max_results) = self.bounds(options);
        let term = text::normalize(term);
        if term.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let merger = self.term_merger(&term, max_distance, max_results);
        let mut hits =
            merger.into_ranked(self.config.ranking, &[term], |v| self.profiles.get(v));
        hits.truncate(max_results);
        hits
    }

    /// Look a normalized term up on both axes and merge the two candidate
    /// lists as a single step.
    fn term_merger(&self, term: &str, max_distance: f64, max_results: usize) -> ResultMerger<V> {
        let ltr_hits = self
            .ltr
            .search(self.encoder.encode_ltr(term), max_distance, max_results);
        let rtl_hits = self.rtl.search(
            self.encoder
                .encode_secondary(term, self.config.secondary_axis),
            max_distance,
            max_results,
        );

        let factor = self.config.rtl_penalty_factor;
        let candidates = ltr_hits.into_iter().chain(
            rtl_hits
                .into_iter()
                .map(|c| Candidate::new(c.distance * factor, c.value)),
        );

        let mut merger = ResultMerger::new(self.config.max_distance);
        merger.merge(candidates, 1.0);
        merger
    }

    fn bounds(&self, options: SearchOptions) -> (f64, usize) {
        (
            options
                .max_search_distance
                .unwrap_or_else(|| self.config.effective_max_search_distance()),
            options
                .max_search_results
                .unwrap_or(self.config.max_search_results),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Distribution, SecondaryAxis};
    use pretty_assertions::assert_eq;

    fn cities() -> StringMap<&'static str> {
        let mut map = StringMap::new();
        map.insert("New York", "nyc");
        map.insert("Newark", "ewr");
        map.insert("York", "york");
        map.insert("Los Angeles", "lax");
        map
    }

    #[test]
    fn test_insert_indexes_every_term() {
        let map = cities();
        assert_eq!(map.len(), 4);
        // new, york, newark, los, angeles ("york" shares a key with "new york")
        assert_eq!(map.ltr_index().len(), 5);
        assert_eq!(map.rtl_index().len(), 5);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut map = StringMap::new();
        map.insert("alpha", 1);
        map.insert("alpha", 1);
        let key = map.encoder().encode_ltr("alpha");
        assert_eq!(map.ltr_index().values_at(key), &[1]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_blank_label_is_ignored() {
        let mut map = StringMap::new();
        map.insert("  ,. ", 1);
        map.insert("123", 2);
        assert!(map.is_empty());
        assert!(map.ltr_index().is_empty());
    }

    #[test]
    fn test_profile_recorded_once() {
        let mut map = StringMap::new();
        map.insert("Saint Louis", 7);
        map.insert("STL", 7);
        let profile = map.profile(&7).unwrap();
        assert_eq!(profile.term_count, 2);
        assert_eq!(profile.normalized, "saint louis");

        // The later label is still searchable
        assert_eq!(map.search("stl")[0].value, 7);
    }

    #[test]
    fn test_search_exact_label_first() {
        let map = cities();
        let hits = map.search("new york");
        assert_eq!(hits[0].value, "nyc");
        assert!(hits[0].score < 1e-9);
    }

    #[test]
    fn test_search_empty_query() {
        let map = cities();
        assert!(map.search("").is_empty());
        assert!(map.search(" ,. ").is_empty());
    }

    #[test]
    fn test_search_empty_index() {
        let map: StringMap<u32> = StringMap::new();
        assert!(map.search("anything").is_empty());
        assert!(map.search_term("anything").is_empty());
    }

    #[test]
    fn test_search_zero_results_limit() {
        let map = cities();
        let options = SearchOptions::new().max_search_results(0);
        assert!(map.search_with("new york", options).is_empty());
        assert!(map.search_term_with("york", options).is_empty());
    }

    #[test]
    fn test_search_respects_result_limit() {
        let map = cities();
        let options = SearchOptions::new().max_search_results(2);
        assert!(map.search_with("new york", options).len() <= 2);
    }

    #[test]
    fn test_search_term_normalizes() {
        let map = cities();
        let hits = map.search_term("YÖRK");
        assert_eq!(hits[0].value, "york");
    }

    #[test]
    fn test_search_term_blank() {
        let map = cities();
        assert!(map.search_term("42").is_empty());
    }

    #[test]
    fn test_search_zero_distance_exact_only() {
        let map = cities();
        let options = SearchOptions::new().max_search_distance(0.0);
        let hits = map.search_term_with("newark", options);
        let values: Vec<&str> = hits.iter().map(|h| h.value).collect();
        assert_eq!(values, vec!["ewr"]);
    }

    #[test]
    fn test_with_config_validates() {
        let config = StringMapConfig {
            rtl_penalty_factor: 0.5,
            ..Default::default()
        };
        assert!(StringMap::<u32>::with_config(config).is_err());
    }

    #[test]
    fn test_distribution_from_config() {
        let config = StringMapConfig::default().with_distribution(Distribution::Ascii);
        let map = StringMap::<u32>::with_config(config).unwrap();
        assert_eq!(map.encoder().distribution(), Distribution::Ascii);
    }

    #[test]
    fn test_middle_out_axis() {
        let config = StringMapConfig::default().with_secondary_axis(SecondaryAxis::MiddleOut);
        let mut map = StringMap::with_config(config).unwrap();
        map.insert("banana", 1);
        let key = map.encoder().encode_middle_out("banana");
        assert_eq!(map.rtl_index().values_at(key), &[1]);
        assert_eq!(map.search_term("banana")[0].value, 1);
    }
}
