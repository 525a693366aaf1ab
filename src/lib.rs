//! Ataxx engine core: a line-oriented text protocol driving a background
//! alpha-beta search, Monte-Carlo search, perft and a shared transposition
//! cache.

pub mod board;
pub mod engine;
pub mod perft;
pub mod protocol;
pub mod sync;
pub mod tt;
mod zobrist;

pub use board::{Move, Position, Side, Square};
pub use engine::{EngineController, EngineOptions};
pub use protocol::ProtocolEngine;
pub use tt::TranspositionCache;
