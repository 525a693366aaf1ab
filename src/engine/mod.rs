//! Engine controller for managing search and game state.
//!
//! The controller owns the live position, the transposition cache and the
//! single background search slot. Every operation that touches the position
//! or writes the cache is refused while a session is live.

mod controller;
mod error;
mod options;

pub use controller::{EngineController, SearchJob, SessionState};
pub use error::EngineError;
pub use options::{EngineOptions, DEFAULT_HASH_MB};
