//! Completing reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::scheduling::{CascadeOutcome, ChainModel, DelayCascade};
use crate::types::Review;

/// Outcome of a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkin {
    /// The review that was completed, or the orphan log entry.
    pub review: Review,
    pub shift_days: i64,
    /// Later reviews moved by the cascade.
    pub shifted: Vec<Review>,
    pub orphan: bool,
}

impl Checkin {
    /// Records to persist together: the completed review plus shifted ones.
    pub fn touched(&self) -> impl Iterator<Item = &Review> {
        std::iter::once(&self.review).chain(self.shifted.iter())
    }
}

/// Marks reviews completed and runs the delay cascade.
pub struct CheckinProcessor;

impl CheckinProcessor {
    /// Complete the problem's earliest pending review in `chain`.
    ///
    /// Without a chain or pending review, a standalone completed review is
    /// logged instead and no schedule is generated.
    pub fn checkin(
        problem_id: &str,
        chain: Option<&mut ChainModel>,
        completion_time: DateTime<Utc>,
    ) -> LcrResult<Checkin> {
        let target = chain
            .as_ref()
            .and_then(|c| c.earliest_pending())
            .map(|r| r.id);

        match (chain, target) {
            (Some(chain), Some(review_id)) => Self::complete_review(chain, review_id, completion_time),
            _ => {
                let review = Review::orphan(problem_id, completion_time);
                tracing::warn!(problem_id, "no pending review, logging orphan completion");
                Ok(Checkin {
                    review,
                    shift_days: 0,
                    shifted: Vec::new(),
                    orphan: true,
                })
            }
        }
    }

    /// Complete a specific review of the chain and cascade its delay.
    ///
    /// A review already completed is rejected, so a cascade never runs twice
    /// for the same completion. On error the chain is left unchanged.
    pub fn complete_review(
        chain: &mut ChainModel,
        review_id: Uuid,
        completion_time: DateTime<Utc>,
    ) -> LcrResult<Checkin> {
        let mut completed = chain.get(review_id).cloned().ok_or_else(|| {
            LcrError::not_found(
                ErrorCode::NfReview,
                format!("review {} not in chain '{}'", review_id, chain.chain_id()),
            )
        })?;
        completed.complete(completion_time)?;

        let CascadeOutcome {
            shift_days, updated, ..
        } = DelayCascade::apply(chain, &completed)?;
        chain.replace(completed.clone())?;

        tracing::info!(
            problem_id = %completed.problem_id,
            iteration = completed.iteration,
            shift_days,
            shifted = updated.len(),
            "review completed"
        );
        Ok(Checkin {
            review: completed,
            shift_days,
            shifted: updated,
            orphan: false,
        })
    }
}
