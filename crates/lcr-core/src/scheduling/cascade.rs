//! Delay cascade for late completions.
//!
//! When a review is completed late, every later pending review in the same
//! chain is pushed back by the same number of days so the spacing between
//! reviews is preserved. Cascades only ever move dates later and never
//! cross chains.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::scheduling::ChainModel;
use crate::types::Review;

/// One date change produced by a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeChange {
    pub review_id: Uuid,
    pub iteration: u32,
    pub old_date: NaiveDate,
    pub new_date: NaiveDate,
}

/// Result of computing or applying a cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeOutcome {
    /// Days every later pending review moves by.
    pub shift_days: i64,
    /// Shifted reviews, ordered by iteration.
    pub updated: Vec<Review>,
    pub changes: Vec<CascadeChange>,
}

impl CascadeOutcome {
    pub fn is_noop(&self) -> bool {
        self.updated.is_empty()
    }
}

/// Delay statistics for a chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CascadeStats {
    pub total_reviews: usize,
    pub completed_reviews: usize,
    pub pending_reviews: usize,
    pub total_delay_days: i64,
    pub average_delay_days: f64,
    pub max_delay_days: i64,
    pub reviews_with_delay: usize,
}

/// Cascade computations over a [`ChainModel`].
pub struct DelayCascade;

impl DelayCascade {
    /// Whole days between the scheduled and actual date; 0 if early or on time.
    pub fn delay_days(scheduled: NaiveDate, actual: NaiveDate) -> i64 {
        (actual - scheduled).num_days().max(0)
    }

    /// Compute the cascade without touching the chain.
    pub fn preview(chain: &ChainModel, completed: &Review) -> LcrResult<CascadeOutcome> {
        let shift_days = Self::shift_for(chain, completed)?;
        if shift_days == 0 {
            return Ok(CascadeOutcome::default());
        }

        let shift = Duration::days(shift_days);
        let mut outcome = CascadeOutcome {
            shift_days,
            ..Default::default()
        };
        for review in chain.future_pending_after(completed.iteration) {
            let new_date = review.scheduled_date.checked_add_signed(shift).ok_or_else(|| {
                LcrError::validation_code(
                    ErrorCode::ValInvalidDate,
                    format!(
                        "shifting review #{} of problem '{}' from {} by {} day(s) leaves the calendar range",
                        review.iteration, review.problem_id, review.scheduled_date, shift_days
                    ),
                )
            })?;
            outcome.changes.push(CascadeChange {
                review_id: review.id,
                iteration: review.iteration,
                old_date: review.scheduled_date,
                new_date,
            });
            let mut shifted = review.clone();
            shifted.scheduled_date = new_date;
            outcome.updated.push(shifted);
        }
        Ok(outcome)
    }

    /// Compute the cascade and write the new dates into the chain.
    ///
    /// The caller must persist `outcome.updated` as a single unit of work.
    pub fn apply(chain: &mut ChainModel, completed: &Review) -> LcrResult<CascadeOutcome> {
        let outcome = Self::preview(chain, completed)?;
        if outcome.is_noop() {
            tracing::debug!(
                chain_id = %chain.chain_id(),
                iteration = completed.iteration,
                "completed on time, no cascade"
            );
            return Ok(outcome);
        }

        // targets come from preview and are all present in the chain
        for change in &outcome.changes {
            if let Some(review) = chain.get_mut(change.review_id) {
                review.scheduled_date = change.new_date;
                review.updated_at = completed.updated_at;
            }
        }
        let updated = outcome
            .updated
            .into_iter()
            .map(|mut r| {
                r.updated_at = completed.updated_at;
                r
            })
            .collect::<Vec<_>>();

        tracing::info!(
            chain_id = %chain.chain_id(),
            shift_days = outcome.shift_days,
            shifted = updated.len(),
            "applied delay cascade"
        );
        Ok(CascadeOutcome {
            shift_days: outcome.shift_days,
            updated,
            changes: outcome.changes,
        })
    }

    /// Delay statistics over every completed review in the chain.
    pub fn statistics(chain: &ChainModel) -> CascadeStats {
        let delays: Vec<i64> = chain
            .completed()
            .filter_map(|r| r.actual_date().map(|actual| Self::delay_days(r.scheduled_date, actual)))
            .collect();

        let total_delay_days: i64 = delays.iter().sum();
        CascadeStats {
            total_reviews: chain.len(),
            completed_reviews: chain.completed().count(),
            pending_reviews: chain.pending().count(),
            total_delay_days,
            average_delay_days: if delays.is_empty() {
                0.0
            } else {
                total_delay_days as f64 / delays.len() as f64
            },
            max_delay_days: delays.iter().copied().max().unwrap_or(0),
            reviews_with_delay: delays.iter().filter(|&&d| d > 0).count(),
        }
    }

    fn shift_for(chain: &ChainModel, completed: &Review) -> LcrResult<i64> {
        if completed.chain_id != *chain.chain_id() {
            return Err(LcrError::consistency(
                ErrorCode::ConChainMismatch,
                chain.chain_id().as_str(),
                format!("review {} is not part of chain '{}'", completed.id, chain.chain_id()),
            ));
        }
        let actual = match (completed.is_completed(), completed.actual_date()) {
            (true, Some(actual)) => actual,
            _ => {
                return Err(LcrError::validation_code(
                    ErrorCode::ValInvalidInput,
                    format!(
                        "review #{} of problem '{}' must be completed before cascading",
                        completed.iteration, completed.problem_id
                    ),
                ))
            }
        };
        Ok(Self::delay_days(completed.scheduled_date, actual))
    }
}
