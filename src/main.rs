//! Headless replay runner (default binary).
//!
//! Drives an engine from a seed and a one-character-per-command script, then
//! prints the final grid and score. With `--json` it prints the full snapshot
//! instead.
//!
//! ```text
//! blockfall [--json] [--seed N] [SCRIPT]
//! ```
//!
//! Script characters: `l` left, `r` right, `u` rotate, `d` soft drop,
//! `t` tick, `x` hard drop, `h` hold, `n` new game. Whitespace is ignored.
//! Set `BLOCKFALL_LOG` to `error`, `warn`, `info`, `debug` or `trace` to see
//! engine diagnostics on stderr.

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

use blockfall::core::{Engine, EngineConfig, LevelTracker, RandomSource};
use blockfall::types::Command;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() -> Result<()> {
    let level = match std::env::var("BLOCKFALL_LOG") {
        Ok(value) => value
            .parse::<LevelFilter>()
            .map_err(|_| anyhow!("invalid BLOCKFALL_LOG value: {:?}", value))?,
        Err(_) => LevelFilter::Off,
    };
    log::set_logger(&LOGGER).map_err(|e| anyhow!("failed to install logger: {}", e))?;
    log::set_max_level(level);
    Ok(())
}

/// Replay a command script against a seeded engine
#[derive(Debug, Parser)]
#[command(name = "blockfall")]
#[command(about = "Headless replay runner for the blockfall engine")]
struct Args {
    /// Seed for the random piece source
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// Print the final snapshot as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
    /// One character per command: l r u d t x h n
    #[arg(default_value = "")]
    script: String,
}

fn parse_script(script: &str) -> Result<Vec<Command>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace())
        .enumerate()
        .map(|(i, c)| {
            Command::from_script_char(c)
                .ok_or_else(|| anyhow!("unknown command {:?} at position {}", c, i))
        })
        .collect()
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();
    let commands = parse_script(&args.script)?;

    let config = EngineConfig::default();
    let mut engine =
        Engine::new(config, RandomSource::new(args.seed)).context("failed to build engine")?;
    let mut levels = LevelTracker::new(config.lines_per_level);

    for command in commands {
        if command == Command::NewGame {
            levels.reset();
        }
        let outcome = engine.apply(command);
        log::trace!("{} -> {:?}", command.as_str(), outcome);
        if let Some(lock) = outcome.lock() {
            if let Some(level) = levels.record(&lock.clear) {
                log::info!("reached level {}", level);
            }
        }
    }

    let snapshot = engine.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    for row in snapshot.grid.visible_rows(snapshot.buffer_rows) {
        let line: String = row
            .iter()
            .map(|&cell| match cell {
                0 => '.',
                id => char::from(b'0' + id % 10),
            })
            .collect();
        println!("{}", line);
    }
    println!("score: {}", snapshot.score);
    println!("lines: {}  level: {}", levels.lines(), levels.level());
    println!(
        "held: {}  status: {}  seed: {}",
        snapshot.held.map_or("-", |kind| kind.as_str()),
        if snapshot.playable() { "running" } else { "game over" },
        engine.source().seed()
    );
    Ok(())
}
