//! Position state and accessors.

use std::fmt;

use super::types::{Bitboard, Side, Square, BOARD_SIZE};
use crate::zobrist::ZOBRIST;

/// Standard starting position
pub const START_FEN: &str = "x5o/7/7/7/7/7/o5x x 0 1";

/// Half-moves without a single move or a capture after which the game is drawn
pub const HALFMOVE_LIMIT: u32 = 100;

/// Final result of a finished game
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(Side),
    Draw,
}

/// Information needed to take back a move
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnmakeInfo {
    pub(crate) captured: Bitboard,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

/// Board contents and side to move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub(crate) stones: [Bitboard; 2],
    pub(crate) gaps: Bitboard,
    pub(crate) turn: Side,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    /// The standard starting position
    #[must_use]
    pub fn new() -> Self {
        let mut pos = Position::empty();
        for (side, squares) in [(Side::Cross, [42, 6]), (Side::Nought, [48, 0])] {
            for idx in squares {
                pos.stones[side.index()] |= Bitboard::from_square(Square::from_index_unchecked(idx));
            }
        }
        pos.hash = pos.calculate_hash();
        pos
    }

    pub(crate) fn empty() -> Self {
        Position {
            stones: [Bitboard::EMPTY; 2],
            gaps: Bitboard::EMPTY,
            turn: Side::Cross,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn turn(&self) -> Side {
        self.turn
    }

    #[inline]
    #[must_use]
    pub fn stones(&self, side: Side) -> Bitboard {
        self.stones[side.index()]
    }

    #[inline]
    #[must_use]
    pub fn gaps(&self) -> Bitboard {
        self.gaps
    }

    /// Squares a stone may enter
    #[inline]
    #[must_use]
    pub fn empty_squares(&self) -> Bitboard {
        !(self.stones[0] | self.stones[1] | self.gaps)
    }

    /// Position fingerprint
    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[must_use]
    pub fn count(&self, side: Side) -> u32 {
        self.stones(side).popcount()
    }

    /// Recompute the fingerprint from scratch
    #[must_use]
    pub fn calculate_hash(&self) -> u64 {
        let mut hash = 0;
        for side in [Side::Cross, Side::Nought] {
            for sq in self.stones(side) {
                hash ^= ZOBRIST.stone(side, sq);
            }
        }
        for sq in self.gaps {
            hash ^= ZOBRIST.gap(sq);
        }
        if self.turn == Side::Nought {
            hash ^= ZOBRIST.side_to_move();
        }
        hash
    }

    pub(crate) fn can_move(&self, side: Side) -> bool {
        !(self.stones(side).reach() & self.empty_squares()).is_empty()
    }

    /// Whether the game has ended
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.stones[0].is_empty()
            || self.stones[1].is_empty()
            || self.empty_squares().is_empty()
            || self.halfmove_clock >= HALFMOVE_LIMIT
            || (!self.can_move(Side::Cross) && !self.can_move(Side::Nought))
    }

    /// Terminal score from the side to move's point of view: the stone
    /// difference, or 0 once the half-move limit is reached.
    #[must_use]
    pub fn score(&self) -> i32 {
        if self.halfmove_clock >= HALFMOVE_LIMIT {
            return 0;
        }
        self.count(self.turn) as i32 - self.count(self.turn.opponent()) as i32
    }

    /// Result of the game, or `None` while moves remain
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.generate_moves().is_empty() {
            return None;
        }
        let score = self.score();
        Some(match score {
            0 => Outcome::Draw,
            s if s > 0 => Outcome::Winner(self.turn),
            _ => Outcome::Winner(self.turn.opponent()),
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..BOARD_SIZE).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..BOARD_SIZE {
                let sq = Square::from_index_unchecked(rank * BOARD_SIZE + file);
                let c = if self.stones(Side::Cross).contains(sq) {
                    'X'
                } else if self.stones(Side::Nought).contains(sq) {
                    'O'
                } else if self.gaps.contains(sq) {
                    ' '
                } else {
                    '-'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "  abcdefg")?;
        writeln!(f, "Turn: {}", self.turn)?;
        writeln!(f, "FEN: {}", self.to_fen())?;
        write!(f, "Hash: {:#018x}", self.hash)
    }
}
