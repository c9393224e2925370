// UCI (Universal Chess Interface) binary

use std::io::{self, Write};

use bear_chess::engines::engine_iterative::{IterativeEngine, DEFAULT_TT_ENTRIES};
use bear_chess::engines::engine_trait::Engine;
use bear_chess::uci::uci_top::{run_uci_loop, spawn_stdin_reader};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Transposition table size in entries
    #[arg(long, default_value_t = DEFAULT_TT_ENTRIES)]
    tt_size: usize,

    /// Search depth used when `go` carries no depth or clock
    #[arg(long, default_value_t = 4)]
    depth: u8,
}

fn main() {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr only.
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

    let engine = IterativeEngine::new(args.depth, args.tt_size);
    log::debug!(
        "engine ready: depth {} tt {} entries",
        args.depth,
        engine.tt_len()
    );
    let commands = spawn_stdin_reader(engine.stop_signal());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run_uci_loop(Box::new(engine), commands, &mut out) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
