//! Storage traits and the SQLite implementation.
//!
//! Reads go through per-record traits. Every write goes through
//! [`Store::commit`], which applies a whole [`ChangeSet`] atomically.

mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;

use crate::error::LcrResult;
use crate::types::{ChainId, Problem, Review, Session};

/// Problem record queries.
pub trait ProblemStore: Send + Sync {
    /// Get a problem by identifier.
    fn get_problem(&self, problem_id: &str) -> LcrResult<Option<Problem>>;
}

/// Review record queries.
pub trait ReviewStore: Send + Sync {
    /// All reviews of a problem, any chain, ordered by chain then iteration.
    fn reviews_for_problem(&self, problem_id: &str) -> LcrResult<Vec<Review>>;

    /// All reviews of a chain ordered by iteration.
    fn reviews_in_chain(&self, chain_id: &ChainId) -> LcrResult<Vec<Review>>;

    /// Pending reviews scheduled on or before `as_of`, ascending by date.
    fn due_reviews(&self, as_of: NaiveDate) -> LcrResult<Vec<Review>>;

    /// Completed reviews whose completion date falls in `[start, end]`, newest first.
    fn completed_between(&self, start: NaiveDate, end: NaiveDate) -> LcrResult<Vec<Review>>;

    /// Pending reviews scheduled in `[start, end]`, ascending by date.
    fn pending_between(&self, start: NaiveDate, end: NaiveDate) -> LcrResult<Vec<Review>>;
}

/// Timer session queries.
pub trait SessionStore: Send + Sync {
    /// The running session of a problem, if any.
    fn active_session(&self, problem_id: &str) -> LcrResult<Option<Session>>;

    /// All sessions of a problem, newest first.
    fn sessions_for_problem(&self, problem_id: &str) -> LcrResult<Vec<Session>>;
}

/// Full storage backend.
pub trait Store: ProblemStore + ReviewStore + SessionStore {
    /// Apply every change in one transaction: all of it lands or none of it.
    fn commit(&self, changes: &ChangeSet) -> LcrResult<()>;

    /// Delete a problem with its reviews and sessions.
    fn delete_problem(&self, problem_id: &str) -> LcrResult<bool>;
}

/// A unit of work for [`Store::commit`].
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Problems to insert or update.
    pub problems: Vec<Problem>,
    /// New reviews.
    pub inserted_reviews: Vec<Review>,
    /// Existing reviews with changed dates or status.
    pub updated_reviews: Vec<Review>,
    /// Sessions to insert or update.
    pub sessions: Vec<Session>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_problem(mut self, problem: Problem) -> Self {
        self.problems.push(problem);
        self
    }

    pub fn insert_reviews(mut self, reviews: impl IntoIterator<Item = Review>) -> Self {
        self.inserted_reviews.extend(reviews);
        self
    }

    pub fn update_reviews(mut self, reviews: impl IntoIterator<Item = Review>) -> Self {
        self.updated_reviews.extend(reviews);
        self
    }

    pub fn upsert_session(mut self, session: Session) -> Self {
        self.sessions.push(session);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
            && self.inserted_reviews.is_empty()
            && self.updated_reviews.is_empty()
            && self.sessions.is_empty()
    }
}
