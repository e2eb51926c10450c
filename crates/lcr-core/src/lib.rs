//! lcr-core - Core library for lcr.
//!
//! This crate provides the record types, the review scheduling engine, the
//! SQLite store and the [`Tracker`] facade for spaced-repetition practice
//! tracking.
//!
//! # Example
//!
//! ```ignore
//! use lcr_core::{LcrConfig, ProblemInput, SqliteStore, Tracker};
//!
//! let config = LcrConfig::load(None)?;
//! let store = SqliteStore::open(config.db_path())?;
//! let mut tracker = Tracker::new(store, config)?;
//!
//! // Plan four reviews starting today
//! let plan = tracker.plan(&ProblemInput::parse("(E) 1. Two Sum")?, None, None)?;
//!
//! // Complete the next one; later reviews shift if it was late
//! let checkin = tracker.checkin("1")?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod scheduling;
pub mod store;
pub mod tracker;
pub mod types;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::LcrConfig;
pub use error::{ErrorCode, LcrError, LcrResult};
pub use input::{parse_date, ProblemInput};
pub use scheduling::{
    CascadeOutcome, CascadeStats, ChainModel, CheckinProcessor, DelayCascade, IntervalScheduler, ReviewPlanner,
};
pub use store::{ChangeSet, ProblemStore, ReviewStore, SessionStore, SqliteStore, Store};
pub use tracker::{CheckinSummary, DateRange, DueReview, History, PlanSummary, TimedSession, TimerSummary, Tracker};
pub use types::{ChainId, Difficulty, Problem, Review, ReviewStatus, Session};
