//! Static evaluation.
//!
//! Scores are from the side to move's point of view. The total is the sum of
//! a few independent terms so the protocol can print them separately.

use std::fmt;

use super::types::{Side, Square, NUM_SQUARES};
use super::Position;

const STONE_VALUE: i32 = 100;
const MOBILITY_WEIGHT: i32 = 2;

/// Stones on the rim have fewer neighbours and are harder to flip.
#[rustfmt::skip]
const PLACEMENT: [i32; NUM_SQUARES] = [
    8, 4, 4, 4, 4, 4, 8,
    4, 0, 0, 0, 0, 0, 4,
    4, 0, 0, 0, 0, 0, 4,
    4, 0, 0, 0, 0, 0, 4,
    4, 0, 0, 0, 0, 0, 4,
    4, 0, 0, 0, 0, 0, 4,
    8, 4, 4, 4, 4, 4, 8,
];

/// Evaluation broken down into its terms
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalTerms {
    pub material: i32,
    pub mobility: i32,
    pub placement: i32,
}

impl EvalTerms {
    #[must_use]
    pub fn total(&self) -> i32 {
        self.material + self.mobility + self.placement
    }
}

impl fmt::Display for EvalTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "material {}", self.material)?;
        writeln!(f, "mobility {}", self.mobility)?;
        writeln!(f, "placement {}", self.placement)?;
        write!(f, "total {}", self.total())
    }
}

fn placement(pos: &Position, side: Side) -> i32 {
    pos.stones(side)
        .iter()
        .map(|sq: Square| PLACEMENT[sq.index()])
        .sum()
}

impl Position {
    #[must_use]
    pub fn eval_terms(&self) -> EvalTerms {
        let us = self.turn;
        let them = us.opponent();
        EvalTerms {
            material: STONE_VALUE * (self.count(us) as i32 - self.count(them) as i32),
            mobility: MOBILITY_WEIGHT * (self.mobility(us) as i32 - self.mobility(them) as i32),
            placement: placement(self, us) - placement(self, them),
        }
    }

    #[must_use]
    pub fn evaluate(&self) -> i32 {
        self.eval_terms().total()
    }
}
