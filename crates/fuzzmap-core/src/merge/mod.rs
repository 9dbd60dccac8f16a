//! Result merging
//!
//! A [`ResultMerger`] joins candidate lists produced by independent lookups
//! (one per query term, or the two directions of a single term) into one
//! distance vector per value. Each call to [`ResultMerger::merge`] is one
//! step and adds one dimension to every tracked vector; a value absent from
//! a step gets the sentinel distance in that dimension.
//!
//! Once all steps are merged, [`ResultMerger::into_ranked`] scores every
//! value with the selected [`Ranking`] law and sorts ascending.

mod scoring;

pub use scoring::{euclidean, Ranking, ValueProfile, TERM_MISMATCH_PENALTY};

use std::hash::Hash;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::numeric::Candidate;

/// A ranked value, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit<V> {
    pub value: V,
    pub score: f64,
    /// One distance per merge step, sentinel where the value was absent
    pub distances: Vec<f64>,
}

/// Per-value accumulator
#[derive(Debug, Clone)]
pub struct MergeRecord<V> {
    value: V,
    distances: Vec<f64>,
    matches: usize,
    average: f64,
    min_distance: f64,
    last_step: Option<usize>,
}

impl<V> MergeRecord<V> {
    fn new(value: V, distances: Vec<f64>, sentinel: f64) -> Self {
        Self {
            value,
            distances,
            matches: 0,
            average: 0.0,
            min_distance: sentinel,
            last_step: None,
        }
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Number of steps in which the value had at least one candidate
    pub fn matches(&self) -> usize {
        self.matches
    }

    /// Running mean of the distances from matched steps
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    fn record_match(&mut self, step: usize) {
        let distance = self.distances[step];
        self.matches += 1;
        self.average += (distance - self.average) / self.matches as f64;
        self.min_distance = self.min_distance.min(distance);
    }
}

/// Accumulates candidate lists across merge steps
#[derive(Debug, Clone)]
pub struct ResultMerger<V> {
    records: Vec<MergeRecord<V>>,
    index: AHashMap<V, usize>,
    steps: usize,
    sentinel: f64,
}

impl<V: Clone + Eq + Hash> ResultMerger<V> {
    /// Create an empty merger; `sentinel` fills dimensions where a value was absent.
    pub fn new(sentinel: f64) -> Self {
        Self {
            records: Vec::new(),
            index: AHashMap::new(),
            steps: 0,
            sentinel,
        }
    }

    /// Number of merge steps performed
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Number of distinct values tracked
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order
    pub fn records(&self) -> &[MergeRecord<V>] {
        &self.records
    }

    pub fn get(&self, value: &V) -> Option<&MergeRecord<V>> {
        self.index.get(value).map(|&idx| &self.records[idx])
    }

    /// Perform one merge step.
    ///
    /// Every candidate distance is scaled by `distance_factor` and capped at the
    /// sentinel; several candidates for the same value keep the smallest.
    pub fn merge<I>(&mut self, candidates: I, distance_factor: f64)
    where
        I: IntoIterator<Item = Candidate<V>>,
    {
        let step = self.steps;
        let sentinel = self.sentinel;

        for record in &mut self.records {
            record.distances.push(sentinel);
        }

        let mut touched = Vec::new();
        for Candidate { distance, value } in candidates {
            let idx = match self.index.get(&value) {
                Some(&idx) => idx,
                None => {
                    let idx = self.records.len();
                    self.records.push(MergeRecord::new(
                        value.clone(),
                        vec![sentinel; step + 1],
                        sentinel,
                    ));
                    self.index.insert(value, idx);
                    idx
                }
            };

            let record = &mut self.records[idx];
            let scaled = (distance * distance_factor).min(sentinel);
            record.distances[step] = record.distances[step].min(scaled);

            if record.last_step != Some(step) {
                record.last_step = Some(step);
                touched.push(idx);
            }
        }

        for idx in touched {
            self.records[idx].record_match(step);
        }

        self.steps += 1;
    }

    /// Collapse the latest step into one candidate per value.
    ///
    /// Used to feed a single term's combined result into a multi-term merge.
    pub fn into_step_candidates(self) -> Vec<Candidate<V>> {
        let sentinel = self.sentinel;
        self.records
            .into_iter()
            .map(|r| {
                let distance = r.distances.last().copied().unwrap_or(sentinel);
                Candidate::new(distance, r.value)
            })
            .collect()
    }

    /// Score every tracked value and sort ascending by score.
    ///
    /// `query_terms` are the normalized query terms that produced the merge
    /// steps; `lookup` supplies each value's [`ValueProfile`]. Values without
    /// a profile count as a single term.
    pub fn into_ranked<'a, F>(
        self,
        ranking: Ranking,
        query_terms: &[String],
        lookup: F,
    ) -> Vec<SearchHit<V>>
    where
        F: Fn(&V) -> Option<&'a ValueProfile>,
    {
        let steps = self.steps;
        let query_text = query_terms.join(" ");

        let mut hits: Vec<SearchHit<V>> = self
            .records
            .into_iter()
            .map(|record| {
                let profile = lookup(&record.value);
                let term_count = profile.map_or(1, |p| p.term_count);

                let score = match ranking {
                    Ranking::VectorDistance => {
                        scoring::vector_distance(&record.distances, steps, term_count)
                    }
                    Ranking::PenalizedAverage => scoring::penalized_average(
                        record.average,
                        record.matches,
                        steps,
                        query_terms.len(),
                        term_count,
                    ),
                    Ranking::EditDistance => scoring::edit_distance(
                        &query_text,
                        profile.map_or("", |p| p.normalized.as_str()),
                    ),
                };

                SearchHit {
                    value: record.value,
                    score,
                    distances: record.distances,
                }
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }
}
