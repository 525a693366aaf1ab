//! Exhaustive leaf counting for move generation verification.
//!
//! The cache only skips subtrees already counted; totals are the same with
//! or without it.

use crate::board::{Move, Position, HALFMOVE_LIMIT};
use crate::tt::{CacheEntry, Payload, TranspositionCache};

/// Number of leaf positions exactly `depth` plies below `pos`.
///
/// `depth <= 0` returns 1. The position is restored before returning.
pub fn perft(cache: Option<&TranspositionCache>, pos: &mut Position, depth: i32) -> u64 {
    if depth <= 0 {
        return 1;
    }

    let moves = pos.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    // The fingerprint ignores the half-move clock, so only live subtrees
    // that cannot reach the half-move limit are shareable.
    let cacheable = !moves.is_empty()
        && pos.halfmove_clock().saturating_add(depth as u32) < HALFMOVE_LIMIT;
    let cache = cache.filter(|_| cacheable);

    if let Some(cache) = cache {
        if let Some(entry) = cache.probe(pos.hash()) {
            if let Payload::Perft { nodes } = entry.payload {
                if entry.depth as i32 == depth {
                    return nodes;
                }
            }
        }
    }

    let mut nodes = 0;
    for mv in moves {
        let info = pos.make_move(mv);
        nodes += perft(cache, pos, depth - 1);
        pos.unmake_move(mv, info);
    }

    if let Some(cache) = cache {
        if let Some(entry) = CacheEntry::perft(pos.hash(), depth as u32, nodes) {
            cache.store(entry);
        }
    }

    nodes
}

/// Perft broken down by root move, in move generation order.
///
/// The counts sum to `perft(pos, depth)`.
pub fn split_perft(
    cache: Option<&TranspositionCache>,
    pos: &mut Position,
    depth: i32,
) -> Vec<(Move, u64)> {
    let depth = depth.max(1);
    pos.generate_moves()
        .into_iter()
        .map(|mv| {
            let info = pos.make_move(mv);
            let nodes = perft(cache, pos, depth - 1);
            pos.unmake_move(mv, info);
            (mv, nodes)
        })
        .collect()
}
