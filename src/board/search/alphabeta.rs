//! Fixed-depth search.
//!
//! Iterative deepening negamax with alpha-beta pruning. The transposition
//! cache supplies bound cutoffs (never at the root) and the first move to try.

use std::cmp::Reverse;
use std::time::Instant;

use super::{SearchIterationInfo, SearchLimits, SearchResult};
use crate::board::types::MASKS;
use crate::board::{Move, MoveKind, Position, MAX_PLY};
use crate::sync::StopFlag;
use crate::tt::{Bound, CacheEntry, Payload, TranspositionCache};

/// Score of a won game at the root; shrinks by one per ply so quicker wins rank higher
pub const WIN_SCORE: i32 = 10_000;

const INFINITY: i32 = 30_000;

/// Scores beyond this are wins or losses a known number of plies away
const WIN_THRESHOLD: i32 = WIN_SCORE - MAX_PLY as i32;

/// Nodes between clock reads
const CLOCK_CHECK_INTERVAL: u64 = 1024;

/// Search context for a single session
struct AlphaBeta<'a> {
    pos: Position,
    cache: &'a TranspositionCache,
    stop: &'a StopFlag,
    start: Instant,
    deadline: Option<Instant>,
    /// The clock only counts once the first iteration is done
    deadline_armed: bool,
    nodes: u64,
    aborted: bool,
}

fn terminal_score(pos: &Position, ply: usize) -> i32 {
    let ply = ply as i32;
    match pos.score() {
        0 => 0,
        s if s > 0 => WIN_SCORE - ply,
        _ => -(WIN_SCORE - ply),
    }
}

/// Win scores count plies from the root; cached ones count from the node
fn score_to_cache(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= WIN_THRESHOLD {
        score + ply
    } else if score <= -WIN_THRESHOLD {
        score - ply
    } else {
        score
    }
}

fn score_from_cache(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= WIN_THRESHOLD {
        score - ply
    } else if score <= -WIN_THRESHOLD {
        score + ply
    } else {
        score
    }
}

impl AlphaBeta<'_> {
    #[inline]
    fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if self.stop.is_stopped() {
            self.aborted = true;
        } else if self.deadline_armed && self.nodes % CLOCK_CHECK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                self.aborted = Instant::now() >= deadline;
            }
        }
        self.aborted
    }

    /// Higher is tried first: cache move, then by stones flipped, singles before jumps
    fn move_order_key(&self, mv: Move, cache_move: Option<Move>) -> i32 {
        if Some(mv) == cache_move {
            return i32::MAX;
        }
        match mv.kind() {
            MoveKind::Pass => 0,
            kind => {
                let them = self.pos.stones(self.pos.turn().opponent());
                let flips = (MASKS.adjacent[mv.to().index()] & them).popcount() as i32;
                flips * 2 + i32::from(kind == MoveKind::Single)
            }
        }
    }

    fn negamax(&mut self, depth: u32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.nodes += 1;
        if self.should_stop() {
            return 0;
        }
        if self.pos.is_game_over() {
            return terminal_score(&self.pos, ply);
        }
        if depth == 0 || ply >= MAX_PLY {
            return self.pos.evaluate();
        }

        let key = self.pos.hash();
        let mut cache_move = None;
        if let Some(entry) = self.cache.probe(key) {
            if let Payload::Search {
                score,
                best_move,
                bound,
            } = entry.payload
            {
                cache_move = best_move.filter(|&mv| self.pos.is_legal(mv));
                if u32::from(entry.depth) >= depth {
                    let score = score_from_cache(i32::from(score), ply);
                    match bound {
                        Bound::Exact => return score,
                        Bound::Lower if score >= beta => return score,
                        Bound::Upper if score <= alpha => return score,
                        _ => {}
                    }
                }
            }
        }

        let mut moves = self.pos.generate_moves();
        moves.sort_by_cached_key(|&mv| Reverse(self.move_order_key(mv, cache_move)));

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for mv in moves {
            let info = self.pos.make_move(mv);
            let score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
            self.pos.unmake_move(mv, info);

            if self.aborted {
                return 0;
            }
            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::Upper
        } else if best_score >= beta {
            Bound::Lower
        } else {
            Bound::Exact
        };
        self.cache
            .store(CacheEntry::search(
                key,
                depth,
                score_to_cache(best_score, ply),
                bound,
                best_move,
            ));
        best_score
    }

    /// One full-window iteration over the root moves. Returns `None` when
    /// the iteration was cut short. Moves the best move to the front.
    fn root(&mut self, depth: u32, moves: &mut [Move]) -> Option<(Move, i32)> {
        self.nodes += 1;
        let mut alpha = -INFINITY;
        let mut best: Option<(usize, i32)> = None;

        for (idx, &mv) in moves.iter().enumerate() {
            let info = self.pos.make_move(mv);
            let score = -self.negamax(depth - 1, -INFINITY, -alpha, 1);
            self.pos.unmake_move(mv, info);

            if self.aborted {
                return None;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((idx, score));
            }
            alpha = alpha.max(score);
        }

        let (idx, score) = best?;
        moves[..=idx].rotate_right(1);
        self.cache.store(CacheEntry::search(
            self.pos.hash(),
            depth,
            score,
            Bound::Exact,
            Some(moves[0]),
        ));
        Some((moves[0], score))
    }

    /// Best line by following cached moves from the root
    fn extract_pv(&self, first: Move, max_len: usize) -> Vec<Move> {
        let mut pos = self.pos.clone();
        let mut pv = vec![first];
        pos.make_move(first);

        while pv.len() < max_len {
            let next = match self.cache.probe(pos.hash()).map(|e| e.payload) {
                Some(Payload::Search {
                    best_move: Some(mv),
                    ..
                }) if pos.is_legal(mv) => mv,
                _ => break,
            };
            pv.push(next);
            pos.make_move(next);
        }
        pv
    }
}

/// Run a fixed-depth session on a copy of `pos`.
///
/// `on_iteration` is called after every completed iteration. The result's
/// best move comes from the deepest completed iteration, or is the first
/// legal move when none completed.
pub fn search<F>(
    pos: &Position,
    cache: &TranspositionCache,
    limits: SearchLimits,
    stop: &StopFlag,
    mut on_iteration: F,
) -> SearchResult
where
    F: FnMut(&SearchIterationInfo),
{
    let start = Instant::now();
    let mut root_moves = pos.generate_moves();
    let mut result = SearchResult {
        best_move: root_moves.first().copied(),
        score: 0,
        depth: 0,
        nodes: 0,
        stopped: false,
    };
    if root_moves.is_empty() {
        return result;
    }

    let (max_depth, deadline) = match limits {
        SearchLimits::Depth(d) => (d.clamp(1, MAX_PLY as u32), None),
        SearchLimits::MoveTime(t) => (MAX_PLY as u32, Some(start + t)),
        SearchLimits::Infinite => (MAX_PLY as u32, None),
    };

    let mut ctx = AlphaBeta {
        pos: pos.clone(),
        cache,
        stop,
        start,
        deadline,
        deadline_armed: false,
        nodes: 0,
        aborted: false,
    };

    for depth in 1..=max_depth {
        if depth > 1 {
            ctx.deadline_armed = true;
            if deadline.is_some_and(|d| Instant::now() >= d) {
                ctx.aborted = true;
            }
        }
        if ctx.should_stop() {
            break;
        }

        let Some((best_move, score)) = ctx.root(depth, &mut root_moves) else {
            break;
        };
        result.best_move = Some(best_move);
        result.score = score;
        result.depth = depth;

        on_iteration(&SearchIterationInfo {
            depth,
            score,
            nodes: ctx.nodes,
            time: ctx.start.elapsed(),
            pv: ctx.extract_pv(best_move, depth as usize),
        });
    }

    result.nodes = ctx.nodes;
    result.stopped = ctx.aborted;
    log::debug!(
        "search finished: depth {} nodes {} stopped {} in {:?}",
        result.depth,
        result.nodes,
        result.stopped,
        start.elapsed()
    );
    result
}

/// Convenience wrapper for tests and benchmarks: search to a fixed depth
/// without reporting iterations.
#[must_use]
pub fn best_move_at_depth(pos: &Position, cache: &TranspositionCache, depth: u32) -> Option<Move> {
    search(pos, cache, SearchLimits::Depth(depth), &StopFlag::new(), |_| {}).best_move
}
