//! Search module.
//!
//! - Fixed-depth search: iterative deepening negamax with alpha-beta and the
//!   shared transposition cache. Runs on a background session and polls a
//!   [`StopFlag`](crate::sync::StopFlag).
//! - Monte-Carlo search: pure rollouts per root move, or UCT. Runs to its own
//!   budget on the caller's thread.
//! - Random rollouts, shared by both Monte-Carlo variants and the `rollout`
//!   command.

mod alphabeta;
mod mcts;
mod rollout;

use std::fmt;
use std::time::Duration;

use super::Move;

pub use alphabeta::{best_move_at_depth, search, WIN_SCORE};
pub use mcts::{mcts, MctsLimits, MctsReport, MctsStrategy};
pub use rollout::{rollout, RolloutTally};

/// Budget of a fixed-depth session. Depth and time are mutually exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchLimits {
    /// Complete iterations up to this depth (at least 1)
    Depth(u32),
    /// Stop once this much wall-clock time has passed; the first iteration
    /// always completes
    MoveTime(Duration),
    /// Deepen until stopped
    Infinite,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits::Depth(5)
    }
}

/// Report for one completed iteration
#[derive(Clone, Debug)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub score: i32,
    pub nodes: u64,
    pub time: Duration,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchIterationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.time.as_millis();
        let nps = self.nodes as u128 * 1000 / ms.max(1);
        write!(
            f,
            "info depth {} score cp {} nodes {} time {} nps {} pv",
            self.depth, self.score, self.nodes, ms, nps
        )?;
        for mv in &self.pv {
            write!(f, " {mv}")?;
        }
        Ok(())
    }
}

/// Outcome of a fixed-depth session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` only when the root has no legal move
    pub best_move: Option<Move>,
    pub score: i32,
    /// Deepest completed iteration
    pub depth: u32,
    pub nodes: u64,
    /// Whether the session ended on the stop flag or the clock
    pub stopped: bool,
}
