//! Terminal driver for the chess engine.
//!
//! Reads commands from stdin: moves in coordinate notation (`e2e4`), `go` to
//! let the engine move, `undo`, `new`, `board`, `fen`, `moves`, `ply N` and
//! `quit`. Settings come from `chess.toml` and can be overridden on the
//! command line.

mod command;
mod config;
mod driver;

use anyhow::Context;
use chess_engine::Board;
use clap::Parser;
use command::Command;
use config::{validate_ply, Config, EngineSide};
use driver::{Driver, Flow};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Play chess against the engine in the terminal.
#[derive(Parser)]
#[command(name = "chess-cli")]
#[command(about = "Play chess against a fixed-depth search engine")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value_os_t = Config::default_path())]
    config: PathBuf,

    /// Search depth in half-moves (1-4)
    #[arg(long)]
    ply: Option<u32>,

    /// Side played by the engine
    #[arg(long, value_enum)]
    engine: Option<EngineSide>,

    /// Starting position in FEN
    #[arg(long)]
    fen: Option<String>,

    /// Search top-level moves on separate threads
    #[arg(long)]
    parallel: bool,
}

impl Args {
    /// Applies command-line overrides on top of the file configuration.
    fn merge(&self, mut config: Config) -> anyhow::Result<Config> {
        if let Some(ply) = self.ply {
            config.ply = validate_ply(ply)?;
        }
        if let Some(engine) = self.engine {
            config.engine = engine;
        }
        config.parallel |= self.parallel;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let config = args.merge(config)?;
    tracing::info!(
        ply = config.ply,
        engine = ?config.engine,
        parallel = config.parallel,
        "Starting chess-cli"
    );

    let start = match &args.fen {
        Some(fen) => Board::from_fen(fen).with_context(|| format!("invalid FEN {:?}", fen))?,
        None => Board::new(),
    };

    let mut driver = Driver::new(Arc::new(start), config, io::stdout());
    driver.start()?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match Command::parse(&line) {
            Ok(command) => {
                if driver.execute(command)? == Flow::Quit {
                    break;
                }
            }
            Err(command::CommandError::Empty) => {}
            Err(e) => println!("error: {}", e),
        }
    }

    Ok(())
}
