//! Legal move generation.

use super::error::MoveParseError;
use super::types::{Move, MoveKind, MASKS};
use super::Position;

impl Position {
    /// All legal moves for the side to move.
    ///
    /// Empty once the game is over. When the side to move is stuck but the
    /// opponent is not, the only legal move is a pass.
    #[must_use]
    pub fn generate_moves(&self) -> Vec<Move> {
        if self.is_game_over() {
            return Vec::new();
        }

        let own = self.stones(self.turn);
        let empty = self.empty_squares();
        let mut moves = Vec::with_capacity(64);

        for to in own.singles() & empty {
            moves.push(Move::single(to));
        }
        for from in own {
            for to in MASKS.jumps[from.index()] & empty {
                moves.push(Move::double(from, to));
            }
        }

        if moves.is_empty() {
            moves.push(Move::pass());
        }
        moves
    }

    /// Whether `mv` is legal, without generating the full move list
    #[must_use]
    pub fn is_legal(&self, mv: Move) -> bool {
        if self.is_game_over() {
            return false;
        }
        let own = self.stones(self.turn);
        let empty = self.empty_squares();
        match mv.kind() {
            MoveKind::Pass => !self.can_move(self.turn),
            MoveKind::Single => empty.contains(mv.to()) && own.singles().contains(mv.to()),
            MoveKind::Double => {
                own.contains(mv.from())
                    && empty.contains(mv.to())
                    && MASKS.jumps[mv.from().index()].contains(mv.to())
            }
        }
    }

    /// Parse move text and check it is legal here
    pub fn parse_move(&self, text: &str) -> Result<Move, MoveParseError> {
        let mv: Move = text.parse()?;
        if self.is_legal(mv) {
            Ok(mv)
        } else {
            Err(MoveParseError::IllegalMove {
                notation: text.to_string(),
            })
        }
    }

    /// Number of empty squares the side to move can reach; used by evaluation
    #[must_use]
    pub fn mobility(&self, side: super::Side) -> u32 {
        (self.stones(side).reach() & self.empty_squares()).popcount()
    }
}
