//! Ataxx position representation and game logic.
//!
//! Uses 49-bit bitboards for move generation and evaluation. The engine's
//! search and verification code only touches the board through this module.
//!
//! # Example
//! ```
//! use ataxx_engine::board::Position;
//!
//! let pos = Position::new();
//! let moves = pos.generate_moves();
//! println!("Starting position has {} legal moves", moves.len());
//! ```

mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
pub mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveParseError, SquareError};
pub use eval::EvalTerms;
pub use state::{Outcome, Position, UnmakeInfo, HALFMOVE_LIMIT, START_FEN};
pub use types::{Bitboard, Move, MoveKind, Side, Square, MAX_PLY};
