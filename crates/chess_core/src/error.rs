//! Errors surfaced by the rules engine.

use thiserror::Error;

/// Failures of board setup or of the make/unmake protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// FEN text could not be parsed into a position
    #[error("Invalid FEN: {reason}")]
    InvalidFen { reason: String },

    /// Move is not playable by the side to move in the current position
    #[error("Illegal move {mv} in the current position")]
    IllegalMove { mv: String },

    /// `pop` was called with no move on the stack
    #[error("No move to unmake")]
    EmptyStack,
}

impl RulesError {
    pub(crate) fn fen(reason: impl Into<String>) -> Self {
        RulesError::InvalidFen {
            reason: reason.into(),
        }
    }
}

/// Result type alias for rules engine operations
pub type RulesResult<T> = Result<T, RulesError>;
