//! Review scheduling engine.
//!
//! - [`IntervalScheduler`]: base intervals to randomized day-offsets
//! - [`ChainModel`]: ordering and "next due" bookkeeping for one chain
//! - [`DelayCascade`]: pushes later reviews back after a late completion
//! - [`ReviewPlanner`]: creates reviews when a problem is registered
//! - [`CheckinProcessor`]: completes reviews and logs orphan check-ins
//!
//! Everything here is pure over in-memory records; persistence is the
//! caller's job.

mod cascade;
mod chain;
mod checkin;
mod intervals;
mod planner;

pub use cascade::{CascadeChange, CascadeOutcome, CascadeStats, DelayCascade};
pub use chain::{active_chain_for, ChainModel};
pub use checkin::{Checkin, CheckinProcessor};
pub use intervals::{
    generate_intervals, IntervalScheduler, DEFAULT_INTERVALS, DEFAULT_MAX_INTERVAL,
    DEFAULT_RANDOMIZATION, MAX_REVIEW_COUNT,
};
pub use planner::{Plan, PlanRequest, ReviewPlanner, DEFAULT_REVIEW_TIMES};
