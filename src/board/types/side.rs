//! The two players.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A player. Cross (`x`) moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Cross,
    Nought,
}

impl Side {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Cross => 0,
            Side::Nought => 1,
        }
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Side {
        match self {
            Side::Cross => Side::Nought,
            Side::Nought => Side::Cross,
        }
    }

    /// FEN character (`x` or `o`)
    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            Side::Cross => 'x',
            Side::Nought => 'o',
        }
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'x' | 'X' => Some(Side::Cross),
            'o' | 'O' => Some(Side::Nought),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Cross => write!(f, "X"),
            Side::Nought => write!(f, "O"),
        }
    }
}
