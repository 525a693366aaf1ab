//! Line-oriented text protocol.
//!
//! [`ProtocolEngine`] reads command lines, splits them into verbs with
//! [`command::parse`] and drives an [`EngineController`]. Responses go to an
//! [`Output`] shared with the background search, which reports `info` lines
//! and its `bestmove` on its own.

pub mod command;
mod output;
pub mod print;

use std::io::BufRead;
use std::time::Instant;

pub use command::{Command, CommandError, HashTableAction, PositionSpec};
pub use output::{Output, SharedBuffer};

use crate::board::search::{MctsLimits, SearchLimits};
use crate::engine::{EngineController, EngineError, EngineOptions, SessionState};
use print::{
    format_moves, format_result, print_about, print_bestmove, print_nodes, print_perft_info,
    print_ready,
};

/// Games between progress lines of `rollout`
const ROLLOUT_REPORT_INTERVAL: u64 = 100;
const DEFAULT_ROLLOUT_GAMES: u64 = 1000;

/// Whether the caller should keep feeding lines
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Dispatcher state as seen from outside
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolState {
    Idle,
    Searching,
    Quitting,
}

/// Command dispatcher owning the engine for the lifetime of a session
pub struct ProtocolEngine {
    /// `None` once `quit` has released the engine
    engine: Option<EngineController>,
    out: Output,
}

impl ProtocolEngine {
    #[must_use]
    pub fn new(options: EngineOptions, out: Output) -> Self {
        log::info!(
            "{} {} starting with {} MB hash",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            options.hash_mb
        );
        ProtocolEngine {
            engine: Some(EngineController::new(options)),
            out,
        }
    }

    /// The controller, until `quit`
    #[must_use]
    pub fn engine(&self) -> Option<&EngineController> {
        self.engine.as_ref()
    }

    /// Current state. A session whose worker already returned still counts
    /// as searching until the next command reaps it.
    #[must_use]
    pub fn state(&self) -> ProtocolState {
        match &self.engine {
            None => ProtocolState::Quitting,
            Some(engine) => match engine.state() {
                SessionState::Idle => ProtocolState::Idle,
                SessionState::Searching => ProtocolState::Searching,
            },
        }
    }

    /// Join a finished session, if any
    pub fn reap(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.reap_finished();
        }
    }

    /// Read commands until `quit` or end of input. End of input quits.
    pub fn run<R: BufRead>(&mut self, input: R) {
        for line in input.lines() {
            match line {
                Ok(line) => {
                    if self.execute_line(&line) == Flow::Quit {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("failed to read command: {e}");
                    break;
                }
            }
        }
        self.quit();
    }

    /// Interpret every verb on one line, left to right
    pub fn execute_line(&mut self, line: &str) -> Flow {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let mut cursor = 0;

        while cursor < tokens.len() {
            if self.engine.is_none() {
                return Flow::Quit;
            }
            self.reap();

            let (cmd, used) = command::parse(&tokens[cursor..]);
            cursor += used;
            match cmd {
                Ok(cmd) => {
                    if self.dispatch(cmd) == Flow::Quit {
                        return Flow::Quit;
                    }
                }
                Err(e) => self.out.warning(e),
            }
        }

        if self.engine.is_none() {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    /// Stop any session, then release the engine and its cache
    pub fn quit(&mut self) {
        if let Some(engine) = self.engine.take() {
            engine.shutdown();
            log::info!("engine shut down");
        }
    }

    fn report(&self, cmd: &Command, error: &EngineError) {
        match error {
            EngineError::SearchInProgress => {
                self.out
                    .warning(format_args!("cannot {} while searching", cmd.verb()));
            }
            EngineError::Position(e) => {
                self.out
                    .warning(format_args!("set position error ({}) {e}", e.code()));
            }
            EngineError::IllegalMove { error, applied } => {
                log::debug!("move batch stopped: {error}");
                let token = match cmd {
                    Command::Moves(moves) => moves.get(*applied).map_or("?", String::as_str),
                    _ => "?",
                };
                self.out.warning(format_args!("illegal move ({token})"));
            }
        }
    }

    fn dispatch(&mut self, cmd: Command) -> Flow {
        if cmd == Command::Quit {
            self.quit();
            return Flow::Quit;
        }
        let Some(engine) = self.engine.as_mut() else {
            return Flow::Quit;
        };
        let out = &self.out;
        log::trace!("dispatch {cmd:?}");

        let result = match &cmd {
            Command::IsReady => {
                print_ready(out);
                Ok(())
            }
            Command::NewGame => engine.new_game(),
            Command::Go(limits) => {
                let limits = limits.unwrap_or(SearchLimits::Depth(engine.options().go_depth));
                let info_out = out.clone();
                let done_out = out.clone();
                engine.start_search(
                    limits,
                    move |info| info_out.line(info),
                    move |result| print_bestmove(&done_out, result.best_move),
                );
                Ok(())
            }
            Command::Stop => {
                engine.stop_search();
                Ok(())
            }
            Command::Mcts { strategy, limits } => {
                let limits =
                    limits.unwrap_or(MctsLimits::Simulations(engine.options().mcts_simulations));
                let report = engine.run_mcts(*strategy, limits);
                out.line(report);
                print_bestmove(out, report.best_move);
                Ok(())
            }
            Command::Perft(depth) => {
                let depth = depth.unwrap_or(engine.options().perft_depth).max(1);
                if depth > engine.options().perft_warn_depth {
                    out.warning(format_args!("perft({depth}) may take a long time to finish"));
                }
                run_perft(engine, out, depth)
            }
            Command::Split(depth) => {
                let depth = depth.unwrap_or(engine.options().perft_depth).max(1);
                if depth > engine.options().perft_warn_depth {
                    out.warning(format_args!(
                        "split perft({depth}) may take a long time to finish"
                    ));
                }
                engine.split(depth).map(|counts| {
                    for (mv, nodes) in &counts {
                        out.line(format_args!("{mv} {nodes}"));
                    }
                    print_nodes(out, counts.iter().map(|(_, n)| n).sum());
                })
            }
            Command::Rollout(games) => {
                let games = games.unwrap_or(DEFAULT_ROLLOUT_GAMES).max(1);
                let tally = engine.run_rollouts(games, ROLLOUT_REPORT_INTERVAL, |tally, elapsed| {
                    out.line(format_args!("info {tally} time {}", elapsed.as_millis()));
                });
                out.line(format_args!("winrate {:.2}%", tally.winrate()));
                Ok(())
            }
            Command::Result => {
                out.line(format_result(engine.position()));
                Ok(())
            }
            Command::HashTable(HashTableAction::Clear) => engine.clear_cache(),
            Command::HashTable(HashTableAction::Print) => {
                out.line(engine.cache().describe());
                Ok(())
            }
            Command::Print => {
                out.line(engine.position());
                Ok(())
            }
            Command::Position(spec) => engine.set_position_fen(spec.as_fen()),
            Command::Eval => {
                out.line(engine.position().eval_terms());
                Ok(())
            }
            Command::MoveGen => {
                out.line(format_moves(&engine.position().generate_moves()));
                Ok(())
            }
            Command::Moves(moves) => engine
                .apply_moves(moves.iter().map(String::as_str))
                .map(|_| ()),
            Command::About => {
                print_about(out);
                Ok(())
            }
            // handled before the engine is borrowed
            Command::Quit => Ok(()),
            Command::Unknown(tok) => {
                out.line(format_args!("Unknown token ({tok})"));
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(&cmd, &e);
        }
        Flow::Continue
    }
}

/// Per-depth counts for 1..=depth, then the total. Depths already counted
/// come straight from the cache.
fn run_perft(engine: &mut EngineController, out: &Output, depth: u32) -> Result<(), EngineError> {
    let mut total = 0;
    for d in 1..=depth {
        let start = Instant::now();
        total = engine.perft(d)?;
        print_perft_info(out, d, total, start.elapsed());
    }
    print_nodes(out, total);
    Ok(())
}

impl Drop for ProtocolEngine {
    fn drop(&mut self) {
        self.quit();
    }
}

#[cfg(test)]
mod tests;
