//! NumericMap - ordered map over real-valued keys with windowed nearest-key search
//!
//! Entries are kept in a single vector sorted ascending by key. Lookups locate
//! a pivot position by binary search and then inspect a symmetric window of
//! positions around it.

use std::cmp::Ordering;
use std::hash::Hash;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A value found near a searched key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate<V> {
    pub distance: f64,
    pub value: V,
}

impl<V> Candidate<V> {
    pub fn new(distance: f64, value: V) -> Self {
        Self { distance, value }
    }
}

/// One key and every distinct value stored under it
#[derive(Debug, Clone)]
pub struct Entry<V> {
    key: f64,
    values: Vec<V>,
}

impl<V> Entry<V> {
    pub fn key(&self) -> f64 {
        self.key
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }
}

/// Ordered numeric map
///
/// Keys are unique and strictly ascending; each entry's values are distinct.
#[derive(Debug, Clone)]
pub struct NumericMap<V> {
    entries: Vec<Entry<V>>,
}

impl<V> Default for NumericMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> NumericMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order
    pub fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    /// Values stored under exactly this key
    pub fn values_at(&self, key: f64) -> &[V] {
        match self.find(key) {
            Ok(pos) => &self.entries[pos].values,
            Err(_) => &[],
        }
    }

    fn find(&self, key: f64) -> Result<usize, usize> {
        self.entries.binary_search_by(|e| e.key.total_cmp(&key))
    }

    /// Pivot for a window search: the last position visited by a binary search
    /// for `key`, which is either the exact match or one of its two neighbours.
    fn pivot(&self, key: f64) -> usize {
        let Some(mut hi) = self.entries.len().checked_sub(1) else {
            return 0;
        };
        let mut lo = 0usize;
        let mut pos = 0usize;

        while lo <= hi {
            pos = lo + (hi - lo) / 2;
            match self.entries[pos].key.partial_cmp(&key) {
                Some(Ordering::Greater) => match pos.checked_sub(1) {
                    Some(p) => hi = p,
                    None => break,
                },
                Some(Ordering::Less) => lo = pos + 1,
                _ => break,
            }
        }
        pos
    }
}

impl<V: Clone + Eq + Hash> NumericMap<V> {
    /// Insert `value` under `key`.
    ///
    /// A new key gets its own entry at its sorted position. An existing key
    /// gains the value unless it is already stored there. NaN keys are ignored.
    pub fn insert(&mut self, key: f64, value: V) {
        if key.is_nan() {
            tracing::warn!("ignoring NaN key");
            return;
        }

        match self.find(key) {
            Ok(pos) => {
                let entry = &mut self.entries[pos];
                if !entry.values.contains(&value) {
                    entry.values.push(value);
                }
            }
            Err(pos) => self.entries.insert(
                pos,
                Entry {
                    key,
                    values: vec![value],
                },
            ),
        }
    }

    /// Find values whose key lies within `max_distance` of `key`.
    ///
    /// Only the `2 * max_results - 1` positions centred on the binary-search
    /// pivot are inspected, so a closer key outside that window is never
    /// reported. A value seen under several keys keeps its smallest distance.
    /// Results are sorted ascending by distance and truncated to `max_results`.
    pub fn search(&self, key: f64, max_distance: f64, max_results: usize) -> Vec<Candidate<V>> {
        if self.entries.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let mut results: Vec<Candidate<V>> = Vec::new();
        let mut seen: AHashMap<V, usize> = AHashMap::new();
        let pivot = self.pivot(key);

        for offset in 0..max_results {
            // Both sides have run off the ends
            if offset > pivot && pivot + offset >= self.entries.len() {
                break;
            }
            let left = pivot.checked_sub(offset);
            let right = pivot + offset;

            if let Some(left) = left {
                self.collect_entry(left, key, max_distance, &mut results, &mut seen);
            }
            if left != Some(right) && right < self.entries.len() {
                self.collect_entry(right, key, max_distance, &mut results, &mut seen);
            }
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(max_results);
        results
    }

    fn collect_entry(
        &self,
        pos: usize,
        key: f64,
        max_distance: f64,
        results: &mut Vec<Candidate<V>>,
        seen: &mut AHashMap<V, usize>,
    ) {
        let entry = &self.entries[pos];
        let distance = (entry.key - key).abs();
        if distance <= max_distance {
            for value in &entry.values {
                match seen.get(value) {
                    Some(&idx) => {
                        if results[idx].distance > distance {
                            results[idx].distance = distance;
                        }
                    }
                    None => {
                        seen.insert(value.clone(), results.len());
                        results.push(Candidate::new(distance, value.clone()));
                    }
                }
            }
        }
    }
}
