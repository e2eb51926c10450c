use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI parser for the `lcr` binary.
#[derive(Debug, Parser)]
#[command(name = "lcr", version, about = "Spaced repetition review scheduler for coding problems")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to .lcrrc, ~/.lcrrc, ~/.config/lcr/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides config and LCR_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Register a problem and plan its reviews
    Add {
        /// Problem reference: "42", "42. Title" or "(E) 42. Title"
        input: String,
        /// Number of reviews to generate
        #[arg(short = 't', long = "times")]
        times: Option<u32>,
        /// Plan a single review on this date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Problem title, overriding any parsed from the input
        #[arg(long)]
        title: Option<String>,
    },

    /// Complete the next pending review of a problem
    Checkin { problem: String },

    /// Show what checking in now would shift, without saving
    Preview { problem: String },

    /// List reviews that are due
    List {
        /// Show reviews due on or before this date (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Show completed and upcoming reviews around today
    Review {
        /// Days before and after today
        #[arg(long, default_value_t = 7)]
        days: u32,
        /// Only this problem
        #[arg(long)]
        problem: Option<String>,
    },

    /// Start a timer for a problem
    Start { problem: String },

    /// Stop the timer and check the problem in
    End { problem: String },

    /// Delay statistics for a problem's review chain
    Stats { problem: String },

    /// Delete a problem with its reviews and sessions
    Remove { problem: String },
}
