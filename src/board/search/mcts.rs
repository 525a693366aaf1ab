//! Monte-Carlo move selection.
//!
//! Two strategies share the same rollout policy:
//! - **Pure**: simulations are spread round-robin over the root moves and the
//!   move with the best mean result wins.
//! - **UCT**: a tree is grown one node per simulation, children are picked by
//!   UCB1, and the most visited root child wins. Values flip sign per level.
//!
//! Both run to their budget on the calling thread and ignore the stop flag.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;

use super::rollout::rollout;
use crate::board::{Move, Position};

/// UCB1 exploration weight (about sqrt 2)
const EXPLORATION: f64 = 1.41;

/// Which Monte-Carlo variant to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MctsStrategy {
    Pure,
    Uct,
}

/// Simulation budget. A time budget runs as many simulations as fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MctsLimits {
    Simulations(u64),
    MoveTime(Duration),
}

impl MctsLimits {
    fn exhausted(&self, simulations: u64, start: Instant) -> bool {
        match *self {
            MctsLimits::Simulations(n) => simulations >= n,
            MctsLimits::MoveTime(t) => start.elapsed() >= t,
        }
    }
}

/// Result of a Monte-Carlo run
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MctsReport {
    /// `None` only when the root has no legal move
    pub best_move: Option<Move>,
    pub simulations: u64,
    pub elapsed: Duration,
}

impl fmt::Display for MctsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "info simulations {} time {}",
            self.simulations,
            self.elapsed.as_millis()
        )
    }
}

/// Pick a move for the side to move in `pos`.
pub fn mcts<R: Rng + ?Sized>(
    pos: &Position,
    strategy: MctsStrategy,
    limits: MctsLimits,
    max_plies: u32,
    rng: &mut R,
) -> MctsReport {
    let start = Instant::now();
    let (best_move, simulations) = match strategy {
        MctsStrategy::Pure => pure(pos, limits, max_plies, rng, start),
        MctsStrategy::Uct => uct(pos, limits, max_plies, rng, start),
    };
    let report = MctsReport {
        best_move,
        simulations,
        elapsed: start.elapsed(),
    };
    log::debug!("{strategy:?} mcts: {report}");
    report
}

fn pure<R: Rng + ?Sized>(
    pos: &Position,
    limits: MctsLimits,
    max_plies: u32,
    rng: &mut R,
    start: Instant,
) -> (Option<Move>, u64) {
    let moves = pos.generate_moves();
    if moves.is_empty() {
        return (None, 0);
    }

    // (sum of results for the mover, visits)
    let mut stats = vec![(0i64, 0u64); moves.len()];
    let mut simulations = 0;

    while !limits.exhausted(simulations, start) {
        let idx = (simulations % moves.len() as u64) as usize;
        let mut child = pos.clone();
        child.make_move(moves[idx]);
        let result = -rollout(child, max_plies, rng);

        stats[idx].0 += i64::from(result);
        stats[idx].1 += 1;
        simulations += 1;
    }

    let mut best = 0;
    let mut best_mean = f64::NEG_INFINITY;
    for (idx, &(total, visits)) in stats.iter().enumerate() {
        if visits == 0 {
            continue;
        }
        let mean = total as f64 / visits as f64;
        if mean > best_mean {
            best_mean = mean;
            best = idx;
        }
    }
    (Some(moves[best]), simulations)
}

struct Node {
    /// Move leading here; `None` at the root
    mv: Option<Move>,
    parent: Option<usize>,
    children: Vec<usize>,
    untried: Vec<Move>,
    visits: u64,
    /// Sum of results from the point of view of the player who made `mv`
    value: f64,
}

impl Node {
    fn new(mv: Option<Move>, parent: Option<usize>, untried: Vec<Move>) -> Self {
        Node {
            mv,
            parent,
            children: Vec::new(),
            untried,
            visits: 0,
            value: 0.0,
        }
    }
}

fn select_child(nodes: &[Node], parent: usize) -> usize {
    let log_visits = (nodes[parent].visits.max(1) as f64).ln();
    let mut best = nodes[parent].children[0];
    let mut best_ucb = f64::NEG_INFINITY;

    for &child in &nodes[parent].children {
        let node = &nodes[child];
        let visits = node.visits.max(1) as f64;
        let ucb = node.value / visits + EXPLORATION * (log_visits / visits).sqrt();
        if ucb > best_ucb {
            best_ucb = ucb;
            best = child;
        }
    }
    best
}

fn uct<R: Rng + ?Sized>(
    pos: &Position,
    limits: MctsLimits,
    max_plies: u32,
    rng: &mut R,
    start: Instant,
) -> (Option<Move>, u64) {
    let root_moves = pos.generate_moves();
    if root_moves.is_empty() {
        return (None, 0);
    }

    let mut nodes = vec![Node::new(None, None, root_moves.clone())];
    let mut simulations = 0;

    while !limits.exhausted(simulations, start) {
        let mut current = pos.clone();
        let mut idx = 0;

        // Selection
        while nodes[idx].untried.is_empty() && !nodes[idx].children.is_empty() {
            idx = select_child(&nodes, idx);
            if let Some(mv) = nodes[idx].mv {
                current.make_move(mv);
            }
        }

        // Expansion
        if !nodes[idx].untried.is_empty() {
            let pick = rng.gen_range(0..nodes[idx].untried.len());
            let mv = nodes[idx].untried.swap_remove(pick);
            current.make_move(mv);
            let child = nodes.len();
            nodes.push(Node::new(Some(mv), Some(idx), current.generate_moves()));
            nodes[idx].children.push(child);
            idx = child;
        }

        // Simulation, scored for the player who moved into the leaf
        let mut value = f64::from(-rollout(current, max_plies, rng));

        // Backpropagation
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            nodes[i].visits += 1;
            nodes[i].value += value;
            value = -value;
            cursor = nodes[i].parent;
        }
        simulations += 1;
    }

    let best = nodes[0]
        .children
        .iter()
        .max_by_key(|&&child| nodes[child].visits)
        .and_then(|&child| nodes[child].mv)
        .unwrap_or(root_moves[0]);
    (Some(best), simulations)
}
