//! Search settings, loadable from TOML.
//!
//! ```toml
//! aspiration_window = 50
//! quiescence_depth = 4
//! ordering = "every-node"
//!
//! [cache]
//! capacity = 200000
//! scope = "search"
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::score::Score;

/// Where move ordering is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Order candidate moves at the root only; interior nodes search in
    /// generator order.
    #[default]
    RootOnly,
    /// Order at every full-width node.
    EveryNode,
}

/// What puts a move in the third ordering bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckBucket {
    /// The move leaves the opponent in check.
    #[default]
    GivesCheck,
    /// The side to move is in check before the move. Every quiet move then
    /// lands in the bucket, so it never changes the order.
    SideInCheck,
}

/// Lifetime of the transposition cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheScope {
    /// Kept across searches until `new_game`.
    #[default]
    Engine,
    /// Cleared at the start of every search.
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Entry limit; `None` grows without bound.
    pub capacity: Option<usize>,
    pub scope: CacheScope,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: Some(1_000_000),
            scope: CacheScope::Engine,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Half-width of the root window around the previous iteration's score
    pub aspiration_window: Score,
    /// Re-search a depth with a widened bound when the root fails low or high
    pub aspiration_research: bool,
    /// Capture plies explored past the horizon (0 evaluates statically)
    pub quiescence_depth: u8,
    pub ordering: OrderingPolicy,
    pub check_bucket: CheckBucket,
    pub cache: CacheConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            aspiration_window: 100,
            aspiration_research: true,
            quiescence_depth: 3,
            ordering: OrderingPolicy::RootOnly,
            check_bucket: CheckBucket::GivesCheck,
            cache: CacheConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aspiration_window <= 0 {
            return Err(ConfigError::Invalid(format!(
                "aspiration_window must be positive, got {}",
                self.aspiration_window
            )));
        }
        if self.cache.capacity == Some(0) {
            return Err(ConfigError::Invalid(
                "cache.capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
