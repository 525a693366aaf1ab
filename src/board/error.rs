//! Error types for board operations.

use std::fmt;

/// Error type for FEN parsing failures.
///
/// Every variant maps to a distinct non-zero [`FenError::code`], which the
/// protocol reports alongside the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    /// No board description at all
    Empty,
    /// Board description does not have 7 ranks
    InvalidRankCount { found: usize },
    /// Unknown character in the board description
    InvalidCell { char: char },
    /// A rank does not describe exactly 7 files
    InvalidFileCount { rank: usize, files: usize },
    /// Side to move missing or not `x`/`o`
    InvalidSideToMove { found: String },
    /// Half-move or full-move counter is not a number
    InvalidCounter { found: String },
}

impl FenError {
    /// Non-zero status code identifying the failure class
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            FenError::Empty => 1,
            FenError::InvalidRankCount { .. } => 2,
            FenError::InvalidCell { .. } => 3,
            FenError::InvalidFileCount { .. } => 4,
            FenError::InvalidSideToMove { .. } => 5,
            FenError::InvalidCounter { .. } => 6,
        }
    }
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::Empty => write!(f, "empty FEN"),
            FenError::InvalidRankCount { found } => {
                write!(f, "FEN must describe 7 ranks, found {found}")
            }
            FenError::InvalidCell { char } => {
                write!(f, "invalid cell character '{char}' in FEN")
            }
            FenError::InvalidFileCount { rank, files } => {
                write!(f, "rank {rank} describes {files} files, expected 7")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move '{found}', expected 'x' or 'o'")
            }
            FenError::InvalidCounter { found } => {
                write!(f, "invalid move counter '{found}'")
            }
        }
    }
}

impl std::error::Error for FenError {}

/// Error type for move text that cannot describe any move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveParseError {
    /// Move text must be 2 or 4 characters (or `0000`)
    InvalidLength { len: usize },
    /// Invalid square notation in move
    InvalidSquare { notation: String },
    /// A relocation whose squares are not exactly two apart
    InvalidDistance { notation: String },
    /// Well-formed, but not legal in the current position
    IllegalMove { notation: String },
}

impl fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveParseError::InvalidLength { len } => {
                write!(f, "move must be 2 or 4 characters, found {len}")
            }
            MoveParseError::InvalidSquare { notation } => {
                write!(f, "invalid square notation in '{notation}'")
            }
            MoveParseError::InvalidDistance { notation } => {
                write!(f, "'{notation}' is not a two-square jump")
            }
            MoveParseError::IllegalMove { notation } => {
                write!(f, "illegal move '{notation}'")
            }
        }
    }
}

impl std::error::Error for MoveParseError {}

/// Error type for square parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    FileOutOfBounds { notation: String },
    RankOutOfBounds { notation: String },
    InvalidNotation { notation: String },
}

impl fmt::Display for SquareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SquareError::FileOutOfBounds { notation } => {
                write!(f, "file out of bounds in '{notation}' (must be a-g)")
            }
            SquareError::RankOutOfBounds { notation } => {
                write!(f, "rank out of bounds in '{notation}' (must be 1-7)")
            }
            SquareError::InvalidNotation { notation } => {
                write!(f, "invalid square notation '{notation}'")
            }
        }
    }
}

impl std::error::Error for SquareError {}
