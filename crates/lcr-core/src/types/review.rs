//! Review records and chain identifiers.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::{ErrorCode, LcrError, LcrResult};

/// Identifier grouping all reviews spawned from one problem's registration lineage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Generate a fresh chain identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ChainId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Review lifecycle state. `Pending -> Completed` happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Completed,
}

/// A scheduled or completed review of a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    /// Owning problem.
    pub problem_id: String,
    pub chain_id: ChainId,
    /// Contractual due date.
    pub scheduled_date: NaiveDate,
    /// When the review was completed. Set once, at check-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub status: ReviewStatus,
    /// 1-based position within the chain.
    pub iteration: u32,
    /// Standalone completion logged without a scheduled counterpart.
    #[serde(default)]
    pub orphan: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Create a pending review.
    pub fn pending(
        problem_id: impl Into<String>,
        chain_id: ChainId,
        scheduled_date: NaiveDate,
        iteration: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id: problem_id.into(),
            chain_id,
            scheduled_date,
            completed_at: None,
            status: ReviewStatus::Pending,
            iteration,
            orphan: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a standalone completed review in its own chain.
    pub fn orphan(problem_id: impl Into<String>, completed_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            problem_id: problem_id.into(),
            chain_id: ChainId::generate(),
            scheduled_date: completed_at.date_naive(),
            completed_at: Some(completed_at),
            status: ReviewStatus::Completed,
            iteration: 1,
            orphan: true,
            created_at: completed_at,
            updated_at: completed_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == ReviewStatus::Completed
    }

    /// Calendar date of completion, if completed.
    pub fn actual_date(&self) -> Option<NaiveDate> {
        self.completed_at.map(|at| at.date_naive())
    }

    /// Mark the review completed. A completed review is never re-opened or
    /// completed a second time.
    pub fn complete(&mut self, at: DateTime<Utc>) -> LcrResult<()> {
        if self.is_completed() {
            return Err(LcrError::validation_with_suggestion(
                ErrorCode::ValReviewAlreadyCompleted,
                format!(
                    "Review #{} of problem '{}' is already completed",
                    self.iteration, self.problem_id
                ),
                "Check in again to complete the next pending review",
            ));
        }
        self.status = ReviewStatus::Completed;
        self.completed_at = Some(at);
        self.updated_at = at;
        Ok(())
    }

    /// Days between the scheduled date and the actual completion date.
    ///
    /// Zero when completed on time, early, or not yet completed.
    pub fn delay_days(&self) -> i64 {
        self.actual_date()
            .map(|actual| (actual - self.scheduled_date).num_days().max(0))
            .unwrap_or(0)
    }

    /// Days overdue as of the given date. Zero for completed reviews.
    pub fn overdue_days(&self, as_of: NaiveDate) -> i64 {
        if !self.is_pending() {
            return 0;
        }
        (as_of - self.scheduled_date).num_days().max(0)
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_completed() { "done" } else { "pending" };
        write!(
            f,
            "Review #{} for problem {} on {} ({})",
            self.iteration, self.problem_id, self.scheduled_date, mark
        )
    }
}
