//! Bitboard type and operations.

use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};

use once_cell::sync::Lazy;

use super::square::{Square, BOARD_SIZE, NUM_SQUARES};

const fn file_mask(file: usize) -> u64 {
    let mut mask = 0u64;
    let mut rank = 0;
    while rank < BOARD_SIZE {
        mask |= 1 << (rank * BOARD_SIZE + file);
        rank += 1;
    }
    mask
}

/// A 49-bit bitboard, bit `rank * 7 + file` set per occupied square.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Bitboard(pub u64);

impl Bitboard {
    pub const EMPTY: Bitboard = Bitboard(0);
    pub const ALL: Bitboard = Bitboard((1 << NUM_SQUARES) - 1);
    pub const FILE_A: Bitboard = Bitboard(file_mask(0));
    pub const FILE_G: Bitboard = Bitboard(file_mask(BOARD_SIZE - 1));
}

impl Bitboard {
    #[inline]
    #[must_use]
    pub const fn from_square(sq: Square) -> Self {
        Bitboard(1 << sq.index())
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn popcount(self) -> u32 {
        self.0.count_ones()
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, sq: Square) -> bool {
        self.0 & (1 << sq.index()) != 0
    }

    /// Every square at king distance <= 1 of a set square (the set itself included).
    #[inline]
    #[must_use]
    pub const fn singles(self) -> Bitboard {
        let bb = self.0;
        let row = (bb | ((bb << 1) & !Self::FILE_A.0) | ((bb >> 1) & !Self::FILE_G.0)) & Self::ALL.0;
        Bitboard((row | (row << BOARD_SIZE) | (row >> BOARD_SIZE)) & Self::ALL.0)
    }

    /// Every square at king distance <= 2 of a set square.
    #[inline]
    #[must_use]
    pub const fn reach(self) -> Bitboard {
        self.singles().singles()
    }

    #[inline]
    #[must_use]
    pub fn iter(self) -> BitboardIter {
        BitboardIter(self.0)
    }
}

impl BitAnd for Bitboard {
    type Output = Bitboard;
    fn bitand(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 & rhs.0)
    }
}

impl BitOr for Bitboard {
    type Output = Bitboard;
    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 | rhs.0)
    }
}

impl BitXor for Bitboard {
    type Output = Bitboard;
    fn bitxor(self, rhs: Bitboard) -> Bitboard {
        Bitboard(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Bitboard;
    fn not(self) -> Bitboard {
        Bitboard(!self.0 & Self::ALL.0)
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Bitboard) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Bitboard) {
        self.0 ^= rhs.0;
    }
}

/// Iterator over the squares of a bitboard, lowest index first.
pub struct BitboardIter(u64);

impl Iterator for BitboardIter {
    type Item = Square;

    #[inline]
    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let idx = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(Square::from_index_unchecked(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;

    fn into_iter(self) -> BitboardIter {
        self.iter()
    }
}

/// Per-square neighbourhood masks.
pub(crate) struct SquareMasks {
    /// Squares at distance exactly 1
    pub(crate) adjacent: [Bitboard; NUM_SQUARES],
    /// Squares at distance exactly 2
    pub(crate) jumps: [Bitboard; NUM_SQUARES],
}

impl SquareMasks {
    fn new() -> Self {
        let mut adjacent = [Bitboard::EMPTY; NUM_SQUARES];
        let mut jumps = [Bitboard::EMPTY; NUM_SQUARES];
        for from in Square::all() {
            for to in Square::all() {
                match from.distance(to) {
                    1 => adjacent[from.index()] |= Bitboard::from_square(to),
                    2 => jumps[from.index()] |= Bitboard::from_square(to),
                    _ => {}
                }
            }
        }
        SquareMasks { adjacent, jumps }
    }
}

pub(crate) static MASKS: Lazy<SquareMasks> = Lazy::new(SquareMasks::new);

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn singles_do_not_wrap_around_files() {
        let a1 = Bitboard::from_square(sq("a1"));
        let expected = [sq("a1"), sq("b1"), sq("a2"), sq("b2")]
            .into_iter()
            .fold(Bitboard::EMPTY, |bb, s| bb | Bitboard::from_square(s));
        assert_eq!(a1.singles(), expected);

        let g4 = Bitboard::from_square(sq("g4"));
        assert_eq!(g4.singles().popcount(), 6);
        assert!(!g4.singles().contains(sq("a5")));
    }

    #[test]
    fn masks_match_ring_sizes() {
        assert_eq!(MASKS.adjacent[sq("a1").index()].popcount(), 3);
        assert_eq!(MASKS.jumps[sq("a1").index()].popcount(), 5);
        assert_eq!(MASKS.adjacent[sq("d4").index()].popcount(), 8);
        assert_eq!(MASKS.jumps[sq("d4").index()].popcount(), 16);
    }

    #[test]
    fn reach_covers_adjacent_and_jumps() {
        for s in Square::all() {
            let bb = Bitboard::from_square(s);
            let ring = MASKS.adjacent[s.index()] | MASKS.jumps[s.index()] | bb;
            assert_eq!(bb.reach(), ring, "square {s}");
        }
    }

    #[test]
    fn not_stays_on_board() {
        assert_eq!(!Bitboard::EMPTY, Bitboard::ALL);
        assert_eq!((!Bitboard::ALL).popcount(), 0);
    }
}
