//! fuzzmap core engine
//!
//! A fuzzy text index that maps free-text labels to caller-owned values and
//! answers approximate queries with ranked matches, without an external
//! search service.
//!
//! # Components
//!
//! - [`NumericMap`] - ordered real-valued keys with windowed nearest-key search
//! - [`Encoder`] - term -> number encoding that keeps shared prefixes close
//! - [`StringMap`] - the public index over a forward and a secondary axis
//! - [`ResultMerger`] - per-value distance vectors across merge steps and
//!   the final [`Ranking`] laws
//!
//! # Example
//!
//! ```rust
//! use fuzzmap_core::{SearchOptions, StringMap};
//!
//! let mut map = StringMap::new();
//! map.insert("new york", "NYC");
//! map.insert("newark", "EWR");
//!
//! let hits = map.search_with("new yrok", SearchOptions::new().max_search_results(5));
//! assert_eq!(hits[0].value, "NYC");
//! ```

pub mod config;
pub mod encoder;
pub mod error;
pub mod merge;
pub mod numeric;
pub mod string_map;
pub mod text;

// Re-export main types at crate root
pub use config::{SearchOptions, StringMapConfig};
pub use encoder::{Distribution, Encoder, SecondaryAxis};
pub use error::{ConfigError, Result};
pub use merge::{Ranking, ResultMerger, SearchHit, ValueProfile};
pub use numeric::{Candidate, NumericMap};
pub use string_map::StringMap;
