//! Uniformly random playouts.

use std::fmt;

use rand::Rng;

use crate::board::Position;

/// Play uniformly random moves from `pos` until the game ends or `max_plies`
/// moves have been made.
///
/// Returns `1`, `0` or `-1`: the sign of the final stone difference from the
/// point of view of the side to move at the start. A game cut off by the ply
/// cap is judged on the stones as they stand.
pub fn rollout<R: Rng + ?Sized>(mut pos: Position, max_plies: u32, rng: &mut R) -> i32 {
    let side = pos.turn();

    for _ in 0..max_plies {
        let moves = pos.generate_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        pos.make_move(mv);
    }

    let score = pos.score();
    let relative = if pos.turn() == side { score } else { -score };
    relative.signum()
}

/// Running win/draw/loss counts over a batch of rollouts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RolloutTally {
    pub wins: u64,
    pub draws: u64,
    pub losses: u64,
}

impl RolloutTally {
    pub fn record(&mut self, result: i32) {
        match result.signum() {
            1 => self.wins += 1,
            0 => self.draws += 1,
            _ => self.losses += 1,
        }
    }

    #[must_use]
    pub fn games(&self) -> u64 {
        self.wins + self.draws + self.losses
    }

    /// Share of games won outright, in percent
    #[must_use]
    pub fn winrate(&self) -> f64 {
        let games = self.games();
        if games == 0 {
            return 0.0;
        }
        self.wins as f64 * 100.0 / games as f64
    }
}

impl fmt::Display for RolloutTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "wins {} draws {} losses {} winrate {:.2}%",
            self.wins,
            self.draws,
            self.losses,
            self.winrate()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rollout_of_finished_game_is_immediate() {
        let pos = Position::from_fen("7/7/7/7/7/7/o5o x 0 1");
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rollout(pos, 300, &mut rng), -1);
    }

    #[test]
    fn test_rollout_zero_plies_judges_current_stones() {
        let pos = Position::from_fen("x5o/7/7/7/7/7/o5x x 0 1");
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(rollout(pos, 0, &mut rng), 0);
    }

    #[test]
    fn test_rollout_is_reproducible_with_seed() {
        let pos = Position::new();
        let a: Vec<i32> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| rollout(pos.clone(), 300, &mut rng)).collect()
        };
        let b: Vec<i32> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| rollout(pos.clone(), 300, &mut rng)).collect()
        };
        assert_eq!(a, b);
        assert!(a.iter().all(|r| (-1..=1).contains(r)));
    }

    #[test]
    fn test_tally_winrate() {
        let mut tally = RolloutTally::default();
        assert_eq!(tally.winrate(), 0.0);
        tally.record(1);
        tally.record(0);
        tally.record(-1);
        tally.record(1);
        assert_eq!(tally.games(), 4);
        assert!((tally.winrate() - 50.0).abs() < 1e-9);
        assert_eq!(tally.to_string(), "wins 2 draws 1 losses 1 winrate 50.00%");

        // Draws do not count towards the winrate
        let draws_only = RolloutTally {
            wins: 0,
            draws: 3,
            losses: 0,
        };
        assert_eq!(draws_only.winrate(), 0.0);
    }
}
