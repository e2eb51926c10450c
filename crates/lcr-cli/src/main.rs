//! lcr - spaced repetition review scheduler for coding problems.
//!
//! # Configuration
//!
//! Settings are read from `--config`, or the first of `.lcrrc`, `~/.lcrrc`,
//! `~/.config/lcr/config.yaml` and `~/.config/lcr/config.toml`. These
//! environment variables (also read from `.env`) override the file:
//!
//! - `LCR_DB_PATH` - database file, defaults to `~/.lcr/lcr.db`
//! - `LCR_INTERVALS` - comma-separated base intervals in days
//! - `LCR_RANDOMIZATION` - interval jitter in `[0, 1]`
//! - `LCR_REVIEW_TIMES` - reviews planned per `add`
//! - `LCR_LOG` - tracing filter, e.g. `lcr_core=debug`

use anyhow::Context;
use clap::Parser;
use lcr_core::{LcrConfig, LcrError, SqliteStore, Tracker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod output;

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        if let Some(hint) = error.downcast_ref::<LcrError>().and_then(LcrError::suggestion) {
            eprintln!("hint: {hint}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);

    let mut config = LcrConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let db_path = config.db_path();
    tracing::debug!(db = %db_path.display(), "opening database");
    let store = SqliteStore::open(&db_path)?;
    let mut tracker = Tracker::new(store, config)?;

    commands::dispatch(cli.command, &mut tracker, cli.json)
}

/// Tracing to stderr so `--json` output on stdout stays clean.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LCR_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();
}
