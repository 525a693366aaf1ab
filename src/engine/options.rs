//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default transposition cache size in megabytes
pub const DEFAULT_HASH_MB: usize = 128;

/// Startup configuration and per-verb defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineOptions {
    /// Transposition cache size, fixed for the engine's lifetime
    pub hash_mb: usize,
    /// Depth used by a bare `go`
    pub go_depth: u32,
    /// Simulations used by a bare `mcts`
    pub mcts_simulations: u64,
    /// Depth used by a bare `perft` or `split`
    pub perft_depth: u32,
    /// Perft depths above this print an advisory warning
    pub perft_warn_depth: u32,
    /// Ply cap of a random playout
    pub rollout_plies: u32,
    /// Fixed seed for Monte-Carlo and rollouts; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        EngineOptions {
            hash_mb: DEFAULT_HASH_MB,
            go_depth: 5,
            mcts_simulations: 100_000,
            perft_depth: 5,
            perft_warn_depth: 12,
            rollout_plies: 300,
            seed: None,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn with_hash_mb(mut self, hash_mb: usize) -> Self {
        self.hash_mb = hash_mb.max(1);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}
