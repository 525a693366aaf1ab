use std::fmt;

use crate::board::{FenError, MoveParseError};

/// Error type for controller operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The operation would touch the position or the cache while a
    /// search session is live
    SearchInProgress,
    /// Position text could not be parsed; the live position is unchanged
    Position(FenError),
    /// A move in a batch was rejected. The `applied` moves before it stay
    /// on the board.
    IllegalMove {
        error: MoveParseError,
        applied: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SearchInProgress => write!(f, "a search is in progress"),
            EngineError::Position(e) => write!(f, "invalid position: {e}"),
            EngineError::IllegalMove { error, applied } => {
                write!(f, "{error} (after {applied} applied)")
            }
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::SearchInProgress => None,
            EngineError::Position(e) => Some(e),
            EngineError::IllegalMove { error, .. } => Some(error),
        }
    }
}

impl From<FenError> for EngineError {
    fn from(e: FenError) -> Self {
        EngineError::Position(e)
    }
}
