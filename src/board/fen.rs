use std::str::FromStr;

use super::error::FenError;
use super::types::{Bitboard, Side, Square, BOARD_SIZE};
use super::{Position, HALFMOVE_LIMIT};

impl Position {
    /// Parse a position from FEN notation.
    ///
    /// Format: `<ranks 7..1 separated by '/'> <x|o> [halfmove] [fullmove]`,
    /// where each rank uses `x`, `o`, `-` (gap) and digits for empty runs.
    pub fn try_from_fen(fen: &str) -> Result<Self, FenError> {
        let mut pos = Position::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        let Some(board) = parts.first() else {
            return Err(FenError::Empty);
        };

        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != BOARD_SIZE {
            return Err(FenError::InvalidRankCount { found: ranks.len() });
        }

        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = BOARD_SIZE - 1 - rank_idx;
            let mut file = 0;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=7).contains(d)) {
                    file += run as usize;
                    continue;
                }
                let Some(sq) = Square::new(file, rank) else {
                    return Err(FenError::InvalidFileCount {
                        rank: rank + 1,
                        files: file + 1,
                    });
                };
                let bit = Bitboard::from_square(sq);
                match c {
                    '-' => pos.gaps |= bit,
                    _ => match Side::from_char(c) {
                        Some(side) => pos.stones[side.index()] |= bit,
                        None => return Err(FenError::InvalidCell { char: c }),
                    },
                }
                file += 1;
            }
            if file != BOARD_SIZE {
                return Err(FenError::InvalidFileCount {
                    rank: rank + 1,
                    files: file,
                });
            }
        }

        let side = parts.get(1).copied().unwrap_or("");
        let mut side_chars = side.chars();
        pos.turn = match (side_chars.next().and_then(Side::from_char), side_chars.next()) {
            (Some(turn), None) => turn,
            _ => {
                return Err(FenError::InvalidSideToMove {
                    found: side.to_string(),
                })
            }
        };

        if let Some(halfmove) = parts.get(2) {
            pos.halfmove_clock = parse_counter(halfmove)?;
            if pos.halfmove_clock > HALFMOVE_LIMIT {
                return Err(FenError::InvalidCounter {
                    found: (*halfmove).to_string(),
                });
            }
        }
        if let Some(fullmove) = parts.get(3) {
            pos.fullmove_number = parse_counter(fullmove)?.max(1);
        }

        pos.hash = pos.calculate_hash();
        Ok(pos)
    }

    /// Parse a position from FEN notation.
    ///
    /// # Panics
    /// Panics if the FEN string is invalid. Use `try_from_fen` for fallible parsing.
    #[must_use]
    pub fn from_fen(fen: &str) -> Self {
        Self::try_from_fen(fen).expect("Invalid FEN string")
    }

    /// Convert the position to FEN notation.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows: Vec<String> = Vec::with_capacity(BOARD_SIZE);
        for rank in (0..BOARD_SIZE).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..BOARD_SIZE {
                let sq = Square::from_index_unchecked(rank * BOARD_SIZE + file);
                let c = if self.stones(Side::Cross).contains(sq) {
                    Some('x')
                } else if self.stones(Side::Nought).contains(sq) {
                    Some('o')
                } else if self.gaps.contains(sq) {
                    Some('-')
                } else {
                    None
                };
                match c {
                    Some(c) => {
                        if empty > 0 {
                            row.push_str(&empty.to_string());
                            empty = 0;
                        }
                        row.push(c);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        format!(
            "{} {} {} {}",
            rows.join("/"),
            self.turn.to_char(),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}

fn parse_counter(s: &str) -> Result<u32, FenError> {
    s.parse().map_err(|_| FenError::InvalidCounter {
        found: s.to_string(),
    })
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "startpos" {
            return Ok(Position::new());
        }
        Position::try_from_fen(s)
    }
}
