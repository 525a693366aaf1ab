//! Command parsing.
//!
//! A line is a run of verbs, each followed by its own arguments. [`parse`]
//! reads one verb and its arguments from the front of a token slice and
//! reports how many tokens it used, so the caller's cursor always lands on
//! the next verb.

use std::fmt;
use std::time::Duration;

use crate::board::search::{MctsLimits, MctsStrategy, SearchLimits};

/// Every verb the protocol understands
pub const VERBS: &[&str] = &[
    "isready",
    "uainewgame",
    "go",
    "stop",
    "mcts",
    "perft",
    "split",
    "rollout",
    "result",
    "hashtable",
    "print",
    "position",
    "eval",
    "movegen",
    "moves",
    "about",
    "quit",
];

/// FEN fields after the board: side, half-move clock, full-move number
const FEN_MAX_TOKENS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashTableAction {
    Clear,
    Print,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionSpec {
    StartPos,
    Fen(String),
}

impl PositionSpec {
    /// Text accepted by [`Position::from_str`](crate::board::Position)
    #[must_use]
    pub fn as_fen(&self) -> &str {
        match self {
            PositionSpec::StartPos => "startpos",
            PositionSpec::Fen(fen) => fen,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    IsReady,
    NewGame,
    /// `None` uses the configured depth
    Go(Option<SearchLimits>),
    Stop,
    Mcts {
        strategy: MctsStrategy,
        limits: Option<MctsLimits>,
    },
    Perft(Option<u32>),
    Split(Option<u32>),
    Rollout(Option<u64>),
    Result,
    HashTable(HashTableAction),
    Print,
    Position(PositionSpec),
    Eval,
    MoveGen,
    Moves(Vec<String>),
    About,
    Quit,
    Unknown(String),
}

impl Command {
    /// Verb as typed, for diagnostics
    #[must_use]
    pub fn verb(&self) -> &str {
        match self {
            Command::IsReady => "isready",
            Command::NewGame => "uainewgame",
            Command::Go(_) => "go",
            Command::Stop => "stop",
            Command::Mcts { .. } => "mcts",
            Command::Perft(_) => "perft",
            Command::Split(_) => "split",
            Command::Rollout(_) => "rollout",
            Command::Result => "result",
            Command::HashTable(HashTableAction::Clear) => "hashtable clear",
            Command::HashTable(HashTableAction::Print) => "hashtable print",
            Command::Print => "print",
            Command::Position(_) => "position",
            Command::Eval => "eval",
            Command::MoveGen => "movegen",
            Command::Moves(_) => "moves",
            Command::About => "about",
            Command::Quit => "quit",
            Command::Unknown(tok) => tok,
        }
    }
}

/// Error type for malformed verb arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A numeric argument did not parse
    InvalidValue { name: &'static str, token: String },
    /// The verb needs an argument that is not there
    MissingArgument { verb: &'static str },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::InvalidValue { name, token } => {
                write!(f, "invalid value for {name} ({token})")
            }
            CommandError::MissingArgument { verb } => write!(f, "missing argument for {verb}"),
        }
    }
}

impl std::error::Error for CommandError {}

#[must_use]
pub fn is_verb(token: &str) -> bool {
    VERBS.contains(&token)
}

fn number<T: std::str::FromStr>(name: &'static str, token: Option<&&str>) -> Result<T, CommandError> {
    let token = token.ok_or(CommandError::MissingArgument { verb: name })?;
    token.parse().map_err(|_| CommandError::InvalidValue {
        name,
        token: (*token).to_string(),
    })
}

/// Optional depth-like argument: taken unless the next token is a verb.
/// Values below 1 clamp to 1.
fn optional_count(name: &'static str, args: &[&str]) -> (Result<Option<u64>, CommandError>, usize) {
    match args.first() {
        Some(tok) if !is_verb(tok) => {
            let parsed = number::<i64>(name, Some(tok)).map(|n| Some(n.max(1) as u64));
            (parsed, 1)
        }
        _ => (Ok(None), 0),
    }
}

/// `go` subcommands in any number; a later one replaces an earlier one
fn parse_go(args: &[&str]) -> (Result<Command, CommandError>, usize) {
    let mut limits = None;
    let mut used = 0;

    while let Some(&tok) = args.get(used) {
        match tok {
            "infinite" => limits = Some(SearchLimits::Infinite),
            "depth" => {
                match number::<i64>("depth", args.get(used + 1)) {
                    Ok(d) => {
                        limits = Some(SearchLimits::Depth(d.clamp(1, u32::MAX as i64) as u32));
                    }
                    Err(e) => return (Err(e), args.len().min(used + 2)),
                }
                used += 1;
            }
            "movetime" => {
                match number::<u64>("movetime", args.get(used + 1)) {
                    Ok(ms) => limits = Some(SearchLimits::MoveTime(Duration::from_millis(ms))),
                    Err(e) => return (Err(e), args.len().min(used + 2)),
                }
                used += 1;
            }
            _ => break,
        }
        used += 1;
    }

    (Ok(Command::Go(limits)), used)
}

fn parse_mcts(args: &[&str]) -> (Result<Command, CommandError>, usize) {
    let mut strategy = MctsStrategy::Uct;
    let mut limits = None;
    let mut used = 0;

    while let Some(&tok) = args.get(used) {
        match tok {
            "pure" => strategy = MctsStrategy::Pure,
            "uct" => strategy = MctsStrategy::Uct,
            "simulations" => {
                match number::<u64>("simulations", args.get(used + 1)) {
                    Ok(n) => limits = Some(MctsLimits::Simulations(n)),
                    Err(e) => return (Err(e), args.len().min(used + 2)),
                }
                used += 1;
            }
            "movetime" => {
                match number::<u64>("movetime", args.get(used + 1)) {
                    Ok(ms) => limits = Some(MctsLimits::MoveTime(Duration::from_millis(ms))),
                    Err(e) => return (Err(e), args.len().min(used + 2)),
                }
                used += 1;
            }
            _ => break,
        }
        used += 1;
    }

    (Ok(Command::Mcts { strategy, limits }), used)
}

fn parse_position(args: &[&str]) -> (Result<Command, CommandError>, usize) {
    match args.first().copied() {
        Some("startpos") => (Ok(Command::Position(PositionSpec::StartPos)), 1),
        Some("fen") => {
            let fields: Vec<&str> = args[1..]
                .iter()
                .take(FEN_MAX_TOKENS)
                .take_while(|tok| !is_verb(tok))
                .copied()
                .collect();
            let used = 1 + fields.len();
            // An empty FEN still reaches the position parser so it is
            // reported with its error code.
            (Ok(Command::Position(PositionSpec::Fen(fields.join(" ")))), used)
        }
        _ => (Err(CommandError::MissingArgument { verb: "position" }), 0),
    }
}

/// Parse one verb from the front of `tokens`.
///
/// Returns the command (or the reason it is malformed) and the number of
/// tokens consumed, which is always at least 1 for a non-empty slice.
pub fn parse(tokens: &[&str]) -> (Result<Command, CommandError>, usize) {
    let Some((&verb, args)) = tokens.split_first() else {
        return (Err(CommandError::MissingArgument { verb: "command" }), 0);
    };

    let (cmd, used) = match verb {
        "isready" => (Ok(Command::IsReady), 0),
        "uainewgame" => (Ok(Command::NewGame), 0),
        "go" => parse_go(args),
        "stop" => (Ok(Command::Stop), 0),
        "mcts" => parse_mcts(args),
        "perft" => {
            let (n, used) = optional_count("depth", args);
            (n.map(|n| Command::Perft(n.map(clamp_u32))), used)
        }
        "split" => {
            let (n, used) = optional_count("depth", args);
            (n.map(|n| Command::Split(n.map(clamp_u32))), used)
        }
        "rollout" => {
            let (n, used) = optional_count("games", args);
            (n.map(Command::Rollout), used)
        }
        "result" => (Ok(Command::Result), 0),
        "hashtable" => match args.first().copied() {
            Some("clear") => (Ok(Command::HashTable(HashTableAction::Clear)), 1),
            Some("print") => (Ok(Command::HashTable(HashTableAction::Print)), 1),
            _ => (Err(CommandError::MissingArgument { verb: "hashtable" }), 0),
        },
        "print" => (Ok(Command::Print), 0),
        "position" => parse_position(args),
        "eval" => (Ok(Command::Eval), 0),
        "movegen" => (Ok(Command::MoveGen), 0),
        "moves" => {
            let moves: Vec<String> = args
                .iter()
                .take_while(|tok| !is_verb(tok))
                .map(|tok| (*tok).to_string())
                .collect();
            let used = moves.len();
            (Ok(Command::Moves(moves)), used)
        }
        "about" => (Ok(Command::About), 0),
        "quit" => (Ok(Command::Quit), 0),
        other => (Ok(Command::Unknown(other.to_string())), 0),
    };

    (cmd, used + 1)
}

fn clamp_u32(n: u64) -> u32 {
    n.min(u64::from(u32::MAX)) as u32
}
