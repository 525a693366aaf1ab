use std::time::Duration;

use super::Output;
use crate::board::{Move, Outcome, Position, Side};

pub fn print_ready(out: &Output) {
    out.line("readyok");
}

pub fn print_bestmove(out: &Output, best_move: Option<Move>) {
    match best_move {
        Some(mv) => out.line(format_args!("bestmove {mv}")),
        None => out.line("bestmove 0000"),
    }
}

pub fn print_perft_info(out: &Output, depth: u32, nodes: u64, elapsed: Duration) {
    let ms = elapsed.as_millis();
    let nps = u128::from(nodes) * 1000 / ms.max(1);
    out.line(format_args!(
        "info depth {depth} nodes {nodes} time {ms} nps {nps}"
    ));
}

pub fn print_nodes(out: &Output, nodes: u64) {
    out.line(format_args!("nodes {nodes}"));
}

#[must_use]
pub fn format_result(pos: &Position) -> &'static str {
    match pos.outcome() {
        None => "result none",
        Some(Outcome::Draw) => "result draw",
        Some(Outcome::Winner(Side::Cross)) => "result X",
        Some(Outcome::Winner(Side::Nought)) => "result O",
    }
}

#[must_use]
pub fn format_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(Move::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn print_about(out: &Output) {
    out.line(format_args!(
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    out.line(env!("CARGO_PKG_DESCRIPTION"));
}
