//! Zobrist hashing for Ataxx positions.
//!
//! Provides incrementally-updatable 64-bit fingerprints for the transposition cache.

use once_cell::sync::Lazy;
use rand::prelude::*;

use crate::board::{Side, Square};

const NUM_SQUARES: usize = 49;

pub(crate) struct ZobristKeys {
    // stone_keys[side][square_index]
    stone_keys: [[u64; NUM_SQUARES]; 2],
    gap_keys: [u64; NUM_SQUARES],
    nought_to_move_key: u64,
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(1234567890_u64);
        let mut stone_keys = [[0; NUM_SQUARES]; 2];

        for side in &mut stone_keys {
            for key in side.iter_mut() {
                *key = rng.gen();
            }
        }

        let mut gap_keys = [0; NUM_SQUARES];
        for key in &mut gap_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            stone_keys,
            gap_keys,
            nought_to_move_key: rng.gen(),
        }
    }

    #[inline]
    pub(crate) fn stone(&self, side: Side, sq: Square) -> u64 {
        self.stone_keys[side.index()][sq.index()]
    }

    /// Gaps are fixed for a game, so only full recomputation uses these
    #[inline]
    pub(crate) fn gap(&self, sq: Square) -> u64 {
        self.gap_keys[sq.index()]
    }

    #[inline]
    pub(crate) fn side_to_move(&self) -> u64 {
        self.nought_to_move_key
    }
}

pub(crate) static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);
