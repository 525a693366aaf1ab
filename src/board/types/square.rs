//! Square types and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::SquareError;

/// Number of files (and ranks) on the board.
pub(crate) const BOARD_SIZE: usize = 7;

/// Number of squares on the board.
pub(crate) const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// A square on the 7x7 board, stored as `rank * 7 + file` (a1 = 0, g7 = 48).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from file and rank (both 0-6), with bounds checking
    #[must_use]
    pub fn new(file: usize, rank: usize) -> Option<Self> {
        if file < BOARD_SIZE && rank < BOARD_SIZE {
            Some(Square((rank * BOARD_SIZE + file) as u8))
        } else {
            None
        }
    }

    /// Create a square from its index (0-48)
    #[must_use]
    pub fn from_index(idx: usize) -> Option<Self> {
        (idx < NUM_SQUARES).then_some(Square(idx as u8))
    }

    #[inline]
    pub(crate) const fn from_index_unchecked(idx: usize) -> Self {
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// File (0-6, where 0 = file a)
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        self.0 as usize % BOARD_SIZE
    }

    /// Rank (0-6, where 0 = rank 1)
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        self.0 as usize / BOARD_SIZE
    }

    /// King-move (Chebyshev) distance between two squares
    #[must_use]
    pub fn distance(self, other: Square) -> usize {
        let df = self.file().abs_diff(other.file());
        let dr = self.rank().abs_diff(other.rank());
        df.max(dr)
    }

    /// Iterate over all 49 squares in index order
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES).map(Square::from_index_unchecked)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.file() as u8) as char;
        let rank = (b'1' + self.rank() as u8) as char;
        write!(f, "{file}{rank}")
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        let file = bytes[0].wrapping_sub(b'a') as usize;
        let rank = bytes[1].wrapping_sub(b'1') as usize;
        if file >= BOARD_SIZE {
            return Err(SquareError::FileOutOfBounds {
                notation: s.to_string(),
            });
        }
        if rank >= BOARD_SIZE {
            return Err(SquareError::RankOutOfBounds {
                notation: s.to_string(),
            });
        }
        Ok(Square((rank * BOARD_SIZE + file) as u8))
    }
}
