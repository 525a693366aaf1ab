//! Move representation.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::square::Square;
use crate::board::error::MoveParseError;

/// Maximum search depth in plies
pub const MAX_PLY: usize = 64;

const KIND_SINGLE: u16 = 1;
const KIND_DOUBLE: u16 = 2;
const KIND_PASS: u16 = 3;

/// What a move does to the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// A new stone appears next to a friendly stone
    Single,
    /// A stone jumps two squares, vacating its origin
    Double,
    /// No move available; the turn passes
    Pass,
}

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-5:   from square (0-48, unused for singles)
/// - bits 6-11:  to square (0-48)
/// - bits 12-13: kind (1 single, 2 double, 3 pass)
///
/// The all-zero value never encodes a move, so it can stand for "no move"
/// in packed storage.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// A placement on `to`
    #[inline]
    #[must_use]
    pub const fn single(to: Square) -> Self {
        Move(((to.index() as u16) << 6) | (KIND_SINGLE << 12))
    }

    /// A jump from `from` to `to`
    #[inline]
    #[must_use]
    pub const fn double(from: Square, to: Square) -> Self {
        Move(from.index() as u16 | ((to.index() as u16) << 6) | (KIND_DOUBLE << 12))
    }

    #[inline]
    #[must_use]
    pub const fn pass() -> Self {
        Move(KIND_PASS << 12)
    }

    #[inline]
    #[must_use]
    pub fn kind(self) -> MoveKind {
        match self.0 >> 12 {
            KIND_SINGLE => MoveKind::Single,
            KIND_DOUBLE => MoveKind::Double,
            _ => MoveKind::Pass,
        }
    }

    #[inline]
    #[must_use]
    pub fn from(self) -> Square {
        Square::from_index_unchecked((self.0 & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub fn to(self) -> Square {
        Square::from_index_unchecked(((self.0 >> 6) & 0x3F) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn is_pass(self) -> bool {
        self.0 >> 12 == KIND_PASS
    }

    /// Raw encoding for packed storage
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Rebuild a move from packed storage. Returns `None` for values that do
    /// not encode a move; a decoded move still has to be checked for legality.
    #[must_use]
    pub fn from_u16(bits: u16) -> Option<Self> {
        let kind = bits >> 12;
        let from = (bits & 0x3F) as usize;
        let to = ((bits >> 6) & 0x3F) as usize;
        match kind {
            KIND_SINGLE if to < 49 => Some(Move(bits)),
            KIND_DOUBLE if from < 49 && to < 49 => Some(Move(bits)),
            KIND_PASS => Some(Move::pass()),
            _ => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            MoveKind::Single => write!(f, "{}", self.to()),
            MoveKind::Double => write!(f, "{}{}", self.from(), self.to()),
            MoveKind::Pass => write!(f, "0000"),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

impl FromStr for Move {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid_square = || MoveParseError::InvalidSquare {
            notation: s.to_string(),
        };
        match s.len() {
            _ if s == "0000" => Ok(Move::pass()),
            2 => {
                let to: Square = s.parse().map_err(|_| invalid_square())?;
                Ok(Move::single(to))
            }
            4 if s.is_char_boundary(2) => {
                let from: Square = s[..2].parse().map_err(|_| invalid_square())?;
                let to: Square = s[2..].parse().map_err(|_| invalid_square())?;
                if from.distance(to) != 2 {
                    return Err(MoveParseError::InvalidDistance {
                        notation: s.to_string(),
                    });
                }
                Ok(Move::double(from, to))
            }
            len => Err(MoveParseError::InvalidLength { len }),
        }
    }
}
