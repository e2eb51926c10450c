//! Planning new reviews for a problem.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::scheduling::{ChainModel, IntervalScheduler, MAX_REVIEW_COUNT};
use crate::types::{ChainId, Review};

/// Default number of reviews generated per registration.
pub const DEFAULT_REVIEW_TIMES: u32 = 4;

/// Inputs to a single planning call.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub problem_id: &'a str,
    /// Number of reviews to generate; falls back to the planner default.
    pub count: Option<u32>,
    /// Plan exactly one review on this date instead of a generated schedule.
    pub explicit_date: Option<NaiveDate>,
    /// Date that generated offsets are added to.
    pub reference_date: NaiveDate,
    /// Creation timestamp for new records.
    pub now: DateTime<Utc>,
}

/// Reviews created by a planning call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub chain_id: ChainId,
    pub created: Vec<Review>,
    /// Dates dropped because a pending review already sat on them.
    pub skipped: Vec<NaiveDate>,
}

/// Turns interval offsets into reviews on a problem's chain.
#[derive(Debug, Clone)]
pub struct ReviewPlanner {
    scheduler: IntervalScheduler,
    default_count: u32,
}

impl ReviewPlanner {
    pub fn new(scheduler: IntervalScheduler, default_count: u32) -> LcrResult<Self> {
        if !(1..=MAX_REVIEW_COUNT).contains(&default_count) {
            return Err(LcrError::validation_code(
                ErrorCode::ValInvalidCount,
                format!(
                    "default review count must be between 1 and {}, got {}",
                    MAX_REVIEW_COUNT, default_count
                ),
            ));
        }
        Ok(Self {
            scheduler,
            default_count,
        })
    }

    pub fn scheduler(&self) -> &IntervalScheduler {
        &self.scheduler
    }

    pub fn default_count(&self) -> u32 {
        self.default_count
    }

    /// Plan reviews onto `chain`, which must be the problem's active chain or
    /// an empty one for a first registration.
    ///
    /// Created reviews are appended to `chain` with consecutive iterations.
    /// A date that already has a pending review in the chain is skipped
    /// without consuming an iteration number.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        request: &PlanRequest<'_>,
        chain: &mut ChainModel,
        rng: &mut R,
    ) -> LcrResult<Plan> {
        let dates = match request.explicit_date {
            Some(date) => vec![date],
            None => {
                let count = request.count.unwrap_or(self.default_count);
                self.scheduler
                    .generate_with_rng(count, rng)?
                    .into_iter()
                    .map(|offset| {
                        request
                            .reference_date
                            .checked_add_signed(Duration::days(i64::from(offset)))
                            .ok_or_else(|| {
                                LcrError::validation_code(
                                    ErrorCode::ValInvalidDate,
                                    format!(
                                        "review for problem '{}' {} day(s) after {} leaves the calendar range",
                                        request.problem_id, offset, request.reference_date
                                    ),
                                )
                            })
                    })
                    .collect::<LcrResult<Vec<_>>>()?
            }
        };

        let mut plan = Plan {
            chain_id: chain.chain_id().clone(),
            created: Vec::with_capacity(dates.len()),
            skipped: Vec::new(),
        };

        for date in dates {
            if chain.has_duplicate(date) {
                tracing::warn!(problem_id = request.problem_id, %date, "review already pending on date, skipping");
                plan.skipped.push(date);
                continue;
            }
            let review = Review::pending(
                request.problem_id,
                chain.chain_id().clone(),
                date,
                chain.next_iteration(),
                request.now,
            );
            tracing::debug!(
                problem_id = request.problem_id,
                iteration = review.iteration,
                %date,
                "planned review"
            );
            chain.push(review.clone())?;
            plan.created.push(review);
        }

        tracing::info!(
            problem_id = request.problem_id,
            chain_id = %plan.chain_id,
            created = plan.created.len(),
            skipped = plan.skipped.len(),
            "planned reviews"
        );
        Ok(plan)
    }
}

impl Default for ReviewPlanner {
    fn default() -> Self {
        Self {
            scheduler: IntervalScheduler::default(),
            default_count: DEFAULT_REVIEW_TIMES,
        }
    }
}
