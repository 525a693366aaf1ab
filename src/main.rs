use std::io::{self, Write};

use clap::Parser;

use ataxx_engine::engine::{EngineOptions, DEFAULT_HASH_MB};
use ataxx_engine::protocol::{Output, ProtocolEngine};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Transposition cache size in megabytes
    #[arg(long, default_value_t = DEFAULT_HASH_MB)]
    hash: usize,

    /// Seed for Monte-Carlo search and rollouts (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| {
            writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args())
        })
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();

    let options = EngineOptions::default()
        .with_hash_mb(args.hash)
        .with_seed(args.seed);

    // Protocol output goes to stdout only; logs stay on stderr
    let mut engine = ProtocolEngine::new(options, Output::stdout());
    engine.run(io::stdin().lock());
}
