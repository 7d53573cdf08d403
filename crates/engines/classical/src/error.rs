//! Search and configuration errors.

use std::path::PathBuf;

use chess_core::RulesError;
use thiserror::Error;

/// Why a search produced no move.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Depth budget below one ply
    #[error("Invalid search depth {depth}: must be at least 1")]
    InvalidDepth { depth: u8 },

    /// Search was asked for a move in a position with none
    #[error("No legal moves in the position")]
    NoLegalMoves,

    /// The rules engine rejected a make/unmake request
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Problems loading or validating a [`SearchConfig`](crate::SearchConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
