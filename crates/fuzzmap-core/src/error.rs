//! Configuration error types
//!
//! Indexing and searching never fail; only building a [`StringMapConfig`]
//! can be rejected.
//!
//! [`StringMapConfig`]: crate::config::StringMapConfig

use thiserror::Error;

/// Errors raised while parsing or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Encoding range must be a finite, positive number
    #[error("invalid max distance: {0} (must be finite and > 0)")]
    InvalidMaxDistance(f64),

    /// Secondary-axis penalty must rank suffix matches behind prefix matches
    #[error("invalid rtl penalty factor: {0} (must be finite and > 1)")]
    InvalidPenaltyFactor(f64),

    /// Strict distribution parsing found no preset with this name
    #[error("unknown distribution: '{0}'")]
    UnknownDistribution(String),

    /// No ranking law with this name
    #[error("unknown ranking: '{0}'")]
    UnknownRanking(String),

    /// Malformed JSON configuration document
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
