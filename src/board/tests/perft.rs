//! Perft (performance test) for move generation correctness.

use crate::board::Position;
use crate::perft::{perft, split_perft};
use crate::tt::TranspositionCache;
use std::time::Instant;

struct TestPosition {
    name: &'static str,
    fen: &'static str,
    depths: &'static [(i32, u64)],
}

const TEST_POSITIONS: &[TestPosition] = &[
    TestPosition {
        name: "Start Position",
        fen: "x5o/7/7/7/7/7/o5x x 0 1",
        depths: &[(1, 16), (2, 256), (3, 6460), (4, 155_888)],
    },
    TestPosition {
        name: "Gapped",
        fen: "x5o/7/2-1-2/7/2-1-2/7/o5x x 0 1",
        depths: &[(1, 14), (2, 196), (3, 4184)],
    },
    TestPosition {
        name: "Forced Pass",
        fen: "7/7/7/7/ooooooo/ooooooo/xxxxxxx x 0 1",
        depths: &[(1, 1), (2, 75), (3, 249)],
    },
    TestPosition {
        name: "Cross Blocked In",
        fen: "7/7/7/7/xxxxxxx/xxxxxxx/ooooooo o 0 1",
        depths: &[(1, 1), (2, 75), (3, 249)],
    },
    TestPosition {
        name: "Game Over",
        fen: "7/7/7/7/7/7/o5o x 0 1",
        depths: &[(1, 0), (2, 0)],
    },
];

#[test]
fn test_perft_positions() {
    for position in TEST_POSITIONS {
        let mut pos = Position::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let start = Instant::now();
            let nodes = perft(None, &mut pos, depth);
            assert_eq!(
                nodes, expected,
                "{} depth {depth}: got {nodes}, expected {expected} ({:?})",
                position.name,
                start.elapsed()
            );
        }
    }
}

#[test]
fn test_perft_depth_zero_is_one() {
    for position in TEST_POSITIONS {
        let mut pos = Position::from_fen(position.fen);
        assert_eq!(perft(None, &mut pos, 0), 1, "{}", position.name);
        assert_eq!(perft(None, &mut pos, -3), 1, "{}", position.name);
    }
}

#[test]
fn test_cached_perft_matches_uncached() {
    let cache = TranspositionCache::new(1);
    for position in TEST_POSITIONS {
        let mut pos = Position::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            // Twice: the second run is served from the cache
            assert_eq!(perft(Some(&cache), &mut pos, depth), expected, "{}", position.name);
            assert_eq!(perft(Some(&cache), &mut pos, depth), expected, "{}", position.name);
        }
    }
}

#[test]
fn test_cache_near_halfmove_limit() {
    // Subtrees here reach the half-move limit, so the cache must not be used
    // to share counts with the same stones at a lower clock.
    let cache = TranspositionCache::new(1);
    let mut fresh = Position::from_fen("x5o/7/7/7/7/7/o5x x 0 1");
    let mut late = Position::from_fen("x5o/7/7/7/7/7/o5x x 98 1");

    let late_nodes = perft(None, &mut late, 3);
    assert_eq!(late_nodes, 3896);
    perft(Some(&cache), &mut fresh, 3);
    assert_eq!(perft(Some(&cache), &mut late, 3), late_nodes);
}

#[test]
fn test_cache_distinguishes_gap_layouts() {
    // Same stones and side to move as the start position, different gaps
    let cache = TranspositionCache::new(1);
    let mut start = Position::new();
    let mut walled = Position::from_fen("x5o/7/2---2/2---2/2---2/7/o5x x 0 1");
    assert_ne!(start.hash(), walled.hash());

    let uncached = perft(None, &mut walled, 3);
    assert_eq!(uncached, 3764);
    assert_eq!(perft(Some(&cache), &mut start, 3), 6460);
    assert_eq!(perft(Some(&cache), &mut walled, 3), uncached);
}

#[test]
fn test_finished_game_counts_do_not_leak_through_cache() {
    // The clock has run out here; the same stones at clock 0 still play on
    let cache = TranspositionCache::new(1);
    let mut expired = Position::from_fen("x5o/7/7/7/7/7/o5x x 100 1");
    let mut start = Position::new();

    assert_eq!(perft(Some(&cache), &mut expired, 2), 0);
    assert_eq!(perft(Some(&cache), &mut start, 2), 256);
    assert_eq!(perft(Some(&cache), &mut expired, 2), 0);
}

#[test]
fn test_split_perft_sums_to_perft() {
    for position in TEST_POSITIONS {
        let mut pos = Position::from_fen(position.fen);
        for &(depth, expected) in position.depths {
            let split = split_perft(None, &mut pos, depth);
            let total: u64 = split.iter().map(|(_, n)| n).sum();
            assert_eq!(total, expected, "{} depth {depth}", position.name);
            assert_eq!(split.len() as u64, perft(None, &mut pos, 1));
        }
    }
}

#[test]
fn test_perft_restores_position() {
    let mut pos = Position::from_fen("x5o/7/2-1-2/7/2-1-2/7/o5x x 0 1");
    let before = pos.clone();
    perft(None, &mut pos, 3);
    split_perft(None, &mut pos, 2);
    assert_eq!(pos, before);
}
