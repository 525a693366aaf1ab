use super::state::UnmakeInfo;
use super::types::{Bitboard, MoveKind, Side, MASKS};
use super::{Move, Position};
use crate::zobrist::ZOBRIST;

impl Position {
    /// Apply a move. The move must be legal; use [`Position::is_legal`] or
    /// [`Position::parse_move`] first for untrusted input.
    pub fn make_move(&mut self, mv: Move) -> UnmakeInfo {
        let us = self.turn;
        let them = us.opponent();
        let mut info = UnmakeInfo {
            captured: Bitboard::EMPTY,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        };

        match mv.kind() {
            MoveKind::Pass => self.halfmove_clock = self.halfmove_clock.saturating_add(1),
            kind => {
                let to = mv.to();
                if kind == MoveKind::Double {
                    self.stones[us.index()] ^= Bitboard::from_square(mv.from());
                    self.hash ^= ZOBRIST.stone(us, mv.from());
                }
                self.stones[us.index()] |= Bitboard::from_square(to);
                self.hash ^= ZOBRIST.stone(us, to);

                let captured = MASKS.adjacent[to.index()] & self.stones[them.index()];
                self.flip(captured, them, us);
                info.captured = captured;

                if kind == MoveKind::Single || !captured.is_empty() {
                    self.halfmove_clock = 0;
                } else {
                    self.halfmove_clock = self.halfmove_clock.saturating_add(1);
                }
            }
        }

        if us == Side::Nought {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.turn = them;
        self.hash ^= ZOBRIST.side_to_move();
        info
    }

    /// Take back a move made with [`Position::make_move`]
    pub fn unmake_move(&mut self, mv: Move, info: UnmakeInfo) {
        let them = self.turn;
        let us = them.opponent();
        self.turn = us;
        self.hash ^= ZOBRIST.side_to_move();

        if let MoveKind::Single | MoveKind::Double = mv.kind() {
            let to = mv.to();
            self.flip(info.captured, us, them);
            self.stones[us.index()] ^= Bitboard::from_square(to);
            self.hash ^= ZOBRIST.stone(us, to);
            if mv.kind() == MoveKind::Double {
                self.stones[us.index()] |= Bitboard::from_square(mv.from());
                self.hash ^= ZOBRIST.stone(us, mv.from());
            }
        }

        self.halfmove_clock = info.halfmove_clock;
        self.fullmove_number = info.fullmove_number;
    }

    fn flip(&mut self, squares: Bitboard, from: Side, to: Side) {
        self.stones[from.index()] ^= squares;
        self.stones[to.index()] |= squares;
        for sq in squares {
            self.hash ^= ZOBRIST.stone(from, sq) ^ ZOBRIST.stone(to, sq);
        }
    }

    /// Parse, validate and apply a move given as text
    pub fn make_move_str(&mut self, text: &str) -> Result<Move, super::MoveParseError> {
        let mv = self.parse_move(text)?;
        self.make_move(mv);
        Ok(mv)
    }
}
