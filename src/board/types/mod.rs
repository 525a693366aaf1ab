//! Core Ataxx types.
//!
//! This module contains the fundamental types used throughout the engine:
//! - `Side` - the two players
//! - `Square` - compact board square representation (u8, 0-48)
//! - `Bitboard` - 49-bit board representation
//! - `Move` - placement, relocation or pass

mod bitboard;
mod moves;
mod side;
mod square;

pub use bitboard::Bitboard;
pub use moves::{Move, MoveKind, MAX_PLY};
pub use side::Side;
pub use square::Square;

pub(crate) use bitboard::MASKS;
pub(crate) use square::{BOARD_SIZE, NUM_SQUARES};
