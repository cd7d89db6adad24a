//! This module defines the `VotesRepository` trait, the persistence contract
//! behind the vote ledger: vote records keyed by `(user_id, review_id)` and the
//! counters they are tallied into.
use coach_score_shared::types::{Direction, VoteCounts, VoteOutcome, VoteRecord};

use crate::errors::RepositoryError;

/// A trait that defines the interface for recording votes on reviews.
///
/// Implementors own the one-vote-per-user-per-review invariant and must keep the
/// review's `likes`/`dislikes` counters equal to the tally of its vote records.
#[async_trait::async_trait]
pub trait VotesRepository: Send + Sync {
    /// Applies a vote as one atomic unit.
    ///
    /// Reads the existing record for `(user_id, review_id)`, decides the
    /// transition with `VoteTransition::decide`, writes the record mutation and the
    /// counter delta together and reads the counters back.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Authenticated caller identity
    /// * `review_id` - Target review
    /// * `direction` - Requested vote direction
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - The transition applied and the refreshed counters
    /// * `Err(RepositoryError::ReviewNotFound)` - Review does not exist; nothing was written
    /// * `Err(RepositoryError)` - Any other failure; nothing was written
    async fn cast_vote(
        &self,
        user_id: &str,
        review_id: &str,
        direction: Direction,
    ) -> Result<VoteOutcome, RepositoryError>;

    /// Returns the caller's standing vote on a review, if any.
    async fn get_vote(
        &self,
        user_id: &str,
        review_id: &str,
    ) -> Result<Option<VoteRecord>, RepositoryError>;

    /// Counts the vote records of a review directly, bypassing the stored counters.
    async fn tally_votes(&self, review_id: &str) -> Result<VoteCounts, RepositoryError>;
}
