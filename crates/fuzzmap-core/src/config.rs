//! StringMap configuration

use serde::{Deserialize, Serialize};

use crate::encoder::{Distribution, SecondaryAxis};
use crate::error::{ConfigError, Result};
use crate::merge::Ranking;

/// Width of the encoding range, also the distance sentinel
pub const DEFAULT_MAX_DISTANCE: f64 = 100.0;
/// Scale applied to secondary-axis (suffix) distances
pub const DEFAULT_RTL_PENALTY_FACTOR: f64 = 1.5;
/// Result limit when a call does not override it
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 10;

/// Index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringMapConfig {
    /// Letter ordering for the encoding
    pub distribution: Distribution,
    /// Encoding range `[0, max_distance]`
    pub max_distance: f64,
    /// Default distance bound for searches (`None` = the whole range)
    pub max_search_distance: Option<f64>,
    /// Default result limit for searches
    pub max_search_results: usize,
    /// Secondary-axis distances are multiplied by this before merging
    pub rtl_penalty_factor: f64,
    /// Final ordering law
    pub ranking: Ranking,
    /// Character order of the second index
    pub secondary_axis: SecondaryAxis,
}

impl Default for StringMapConfig {
    fn default() -> Self {
        Self {
            distribution: Distribution::default(),
            max_distance: DEFAULT_MAX_DISTANCE,
            max_search_distance: None,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            rtl_penalty_factor: DEFAULT_RTL_PENALTY_FACTOR,
            ranking: Ranking::default(),
            secondary_axis: SecondaryAxis::default(),
        }
    }
}

impl StringMapConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return Err(ConfigError::InvalidMaxDistance(self.max_distance));
        }
        if !self.rtl_penalty_factor.is_finite() || self.rtl_penalty_factor <= 1.0 {
            return Err(ConfigError::InvalidPenaltyFactor(self.rtl_penalty_factor));
        }
        Ok(())
    }

    /// Distance bound used when a search does not override it
    pub fn effective_max_search_distance(&self) -> f64 {
        self.max_search_distance.unwrap_or(self.max_distance)
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_max_search_results(mut self, max_search_results: usize) -> Self {
        self.max_search_results = max_search_results;
        self
    }

    pub fn with_max_search_distance(mut self, max_search_distance: f64) -> Self {
        self.max_search_distance = Some(max_search_distance);
        self
    }

    pub fn with_secondary_axis(mut self, secondary_axis: SecondaryAxis) -> Self {
        self.secondary_axis = secondary_axis;
        self
    }
}

/// Per-call overrides for the configured search bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub max_search_distance: Option<f64>,
    pub max_search_results: Option<usize>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_search_distance(mut self, distance: f64) -> Self {
        self.max_search_distance = Some(distance);
        self
    }

    pub fn max_search_results(mut self, results: usize) -> Self {
        self.max_search_results = Some(results);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = StringMapConfig::default();
        assert_eq!(config.distribution, Distribution::Qwerty);
        assert_eq!(config.max_search_results, 10);
        assert_eq!(config.effective_max_search_distance(), 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            StringMapConfig::from_json(r#"{"distribution": "ascii", "max_search_results": 3}"#)
                .unwrap();
        assert_eq!(config.distribution, Distribution::Ascii);
        assert_eq!(config.max_search_results, 3);
        assert_eq!(config.rtl_penalty_factor, DEFAULT_RTL_PENALTY_FACTOR);
    }

    #[test]
    fn test_from_json_unknown_distribution_falls_back() {
        let config = StringMapConfig::from_json(r#"{"distribution": "dvorak"}"#).unwrap();
        assert_eq!(config.distribution, Distribution::Qwerty);
    }

    #[test]
    fn test_from_json_ranking_and_axis() {
        let config = StringMapConfig::from_json(
            r#"{"ranking": "penalized_average", "secondary_axis": "middle_out"}"#,
        )
        .unwrap();
        assert_eq!(config.ranking, Ranking::PenalizedAverage);
        assert_eq!(config.secondary_axis, SecondaryAxis::MiddleOut);
    }

    #[test]
    fn test_from_json_malformed() {
        let err = StringMapConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validate_rejects_bad_penalty() {
        let config = StringMapConfig {
            rtl_penalty_factor: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPenaltyFactor(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_max_distance() {
        for bad in [0.0, -1.0, f64::INFINITY, f64::NAN] {
            let config = StringMapConfig {
                max_distance: bad,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidMaxDistance(_))
            ));
        }
    }

    #[test]
    fn test_search_options_builder() {
        let options = SearchOptions::new().max_search_results(3).max_search_distance(5.0);
        assert_eq!(options.max_search_results, Some(3));
        assert_eq!(options.max_search_distance, Some(5.0));
    }
}
