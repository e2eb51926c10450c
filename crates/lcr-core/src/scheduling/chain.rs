//! Review chain bookkeeping.
//!
//! A chain is the ordered set of reviews spawned from one problem's
//! registration lineage. Iterations are unique within a chain and at most one
//! pending review is "next due".

use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::types::{ChainId, Review};

/// In-memory view of one review chain.
#[derive(Debug, Clone)]
pub struct ChainModel {
    chain_id: ChainId,
    /// Sorted by iteration.
    reviews: Vec<Review>,
}

impl ChainModel {
    /// Build a chain model, checking membership and iteration uniqueness.
    pub fn new(chain_id: ChainId, mut reviews: Vec<Review>) -> LcrResult<Self> {
        if let Some(stray) = reviews.iter().find(|r| r.chain_id != chain_id) {
            tracing::error!(chain_id = %chain_id, review_id = %stray.id, "review belongs to another chain");
            return Err(LcrError::consistency(
                ErrorCode::ConChainMismatch,
                chain_id.as_str(),
                format!(
                    "review {} belongs to chain '{}', not '{}'",
                    stray.id, stray.chain_id, chain_id
                ),
            ));
        }
        reviews.sort_by_key(|r| r.iteration);
        let chain = Self { chain_id, reviews };
        chain.validate()?;
        Ok(chain)
    }

    /// An empty chain with a fresh identifier.
    pub fn empty() -> Self {
        Self {
            chain_id: ChainId::generate(),
            reviews: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    /// All reviews ordered by iteration.
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&Review> {
        self.reviews.iter().find(|r| r.id == id)
    }

    pub fn pending(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| r.is_pending())
    }

    pub fn completed(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter().filter(|r| r.is_completed())
    }

    /// The pending review with the smallest scheduled date, ties broken by
    /// smallest iteration.
    pub fn earliest_pending(&self) -> Option<&Review> {
        self.pending().min_by_key(|r| (r.scheduled_date, r.iteration))
    }

    /// Pending reviews with an iteration strictly greater than `iteration`,
    /// ordered by iteration.
    pub fn future_pending_after(&self, iteration: u32) -> Vec<&Review> {
        self.pending().filter(|r| r.iteration > iteration).collect()
    }

    /// True if a pending review already sits on `date`.
    pub fn has_duplicate(&self, date: NaiveDate) -> bool {
        self.pending().any(|r| r.scheduled_date == date)
    }

    /// Highest iteration in the chain, 0 when empty.
    pub fn max_iteration(&self) -> u32 {
        self.reviews.last().map(|r| r.iteration).unwrap_or(0)
    }

    pub fn next_iteration(&self) -> u32 {
        self.max_iteration() + 1
    }

    /// Append a newly created review. Its iteration must exceed every
    /// existing one.
    pub fn push(&mut self, review: Review) -> LcrResult<()> {
        if review.chain_id != self.chain_id {
            return Err(LcrError::consistency(
                ErrorCode::ConChainMismatch,
                self.chain_id.as_str(),
                format!("review {} does not belong to this chain", review.id),
            ));
        }
        if review.iteration <= self.max_iteration() {
            tracing::error!(
                chain_id = %self.chain_id,
                iteration = review.iteration,
                max = self.max_iteration(),
                "non-increasing iteration"
            );
            return Err(LcrError::consistency(
                ErrorCode::ConDuplicateIteration,
                self.chain_id.as_str(),
                format!(
                    "iteration {} is not greater than current maximum {}",
                    review.iteration,
                    self.max_iteration()
                ),
            ));
        }
        self.reviews.push(review);
        Ok(())
    }

    /// Replace a review with an updated copy (matched by id).
    pub fn replace(&mut self, review: Review) -> LcrResult<()> {
        match self.reviews.iter_mut().find(|r| r.id == review.id) {
            Some(slot) if slot.iteration == review.iteration => {
                *slot = review;
                Ok(())
            }
            Some(slot) => Err(LcrError::consistency(
                ErrorCode::ConInvalidState,
                self.chain_id.as_str(),
                format!(
                    "iteration of review {} is immutable ({} -> {})",
                    review.id, slot.iteration, review.iteration
                ),
            )),
            None => Err(LcrError::not_found(
                ErrorCode::NfReview,
                format!("review {} not in chain '{}'", review.id, self.chain_id),
            )),
        }
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut Review> {
        self.reviews.iter_mut().find(|r| r.id == id)
    }

    /// Check that no two reviews share an iteration.
    pub fn validate(&self) -> LcrResult<()> {
        let mut seen = HashSet::with_capacity(self.reviews.len());
        for review in &self.reviews {
            if !seen.insert(review.iteration) {
                tracing::error!(
                    chain_id = %self.chain_id,
                    iteration = review.iteration,
                    "duplicate iteration in chain"
                );
                return Err(LcrError::consistency(
                    ErrorCode::ConDuplicateIteration,
                    self.chain_id.as_str(),
                    format!(
                        "chain '{}' has more than one review with iteration {}",
                        self.chain_id, review.iteration
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// The chain a problem's scheduled reviews belong to.
///
/// Orphan completions live in their own chains and are never selected. When
/// more than one scheduled chain exists, the one holding the most recently
/// created review wins.
pub fn active_chain_for(problem_id: &str, reviews: &[Review]) -> Option<ChainId> {
    reviews
        .iter()
        .filter(|r| r.problem_id == problem_id && !r.orphan)
        .max_by_key(|r| (r.created_at, r.iteration))
        .map(|r| r.chain_id.clone())
}
