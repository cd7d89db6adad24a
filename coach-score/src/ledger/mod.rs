//! The vote ledger: the only component allowed to cast, switch or retract a
//! vote on a review.
//!
//! Each call is an independent transition computed from durable state; the
//! ledger holds no mutable state of its own and can be shared freely across
//! request handlers.
mod retry;

pub use retry::RetryPolicy;

use std::sync::Arc;

use coach_score_repository::{RepositoryError, VotesRepository};
use coach_score_shared::types::{Direction, VoteCounts, VoteOutcome};
use tokio_retry::RetryIf;
use tracing::{info, instrument, warn};

use crate::errors::ServiceError;

pub struct VoteLedger {
    votes: Arc<dyn VotesRepository>,
    retry: RetryPolicy,
}

impl VoteLedger {
    pub fn new(votes: Arc<dyn VotesRepository>, retry: RetryPolicy) -> Self {
        Self { votes, retry }
    }

    /// Casts, switches or retracts `user_id`'s vote on `review_id`.
    ///
    /// # Arguments
    ///
    /// * `user_id` - Caller identity forwarded by the web layer; trusted as authenticated
    /// * `review_id` - Target review
    /// * `action` - Raw requested direction, `"like"` or `"dislike"`
    ///
    /// # Returns
    ///
    /// The review's counters as read back after the vote was written.
    ///
    /// # Errors
    ///
    /// * `Unauthenticated` - `user_id` is absent or empty
    /// * `InvalidArgument` - `action` is not one of the two directions
    /// * `NotFound` - the review does not exist; nothing was written
    /// * `Conflict` / `Unavailable` - still failing after the retry budget; nothing was written
    #[instrument(skip(self), level = "debug")]
    pub async fn cast_vote(
        &self,
        user_id: Option<&str>,
        review_id: &str,
        action: Option<&str>,
    ) -> Result<VoteCounts, ServiceError> {
        let user_id = authenticated(user_id)?;
        let direction = parse_action(action)?;
        if review_id.trim().is_empty() {
            return Err(ServiceError::not_found("Review not found"));
        }

        let outcome = self.apply(user_id, review_id, direction).await?;

        info!(
            user_id,
            review_id,
            transition = %outcome.transition,
            likes = outcome.counts.likes,
            dislikes = outcome.counts.dislikes,
            "Vote applied"
        );

        Ok(outcome.counts)
    }

    /// The caller's standing vote on a review, if any.
    pub async fn current_vote(
        &self,
        user_id: Option<&str>,
        review_id: &str,
    ) -> Result<Option<Direction>, ServiceError> {
        let user_id = authenticated(user_id)?;
        let vote = self.votes.get_vote(user_id, review_id).await?;
        Ok(vote.map(|vote| vote.direction))
    }

    /// Applies the vote, re-issuing it while the repository reports a failure
    /// that was rolled back.
    async fn apply(
        &self,
        user_id: &str,
        review_id: &str,
        direction: Direction,
    ) -> Result<VoteOutcome, ServiceError> {
        let action = || self.votes.cast_vote(user_id, review_id, direction);
        let should_retry = |error: &RepositoryError| {
            let retryable = error.is_retryable();
            if retryable {
                warn!(user_id, review_id, error = %error, "Vote not applied, retrying");
            }
            retryable
        };

        RetryIf::start(self.retry.delays(), action, should_retry)
            .await
            .map_err(ServiceError::from)
    }
}

/// The caller id is opaque: only an absent or empty id is rejected, and the
/// value is used as given.
fn authenticated(user_id: Option<&str>) -> Result<&str, ServiceError> {
    match user_id {
        Some(user_id) if !user_id.is_empty() => Ok(user_id),
        _ => Err(ServiceError::Unauthenticated),
    }
}

fn parse_action(action: Option<&str>) -> Result<Direction, ServiceError> {
    action
        .ok_or_else(|| ServiceError::invalid("Invalid action"))?
        .parse()
        .map_err(|_| ServiceError::invalid("Invalid action"))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use async_trait::async_trait;
    use coach_score_repository::{InMemoryRepository, ReviewsRepository};
    use coach_score_shared::types::{NewReview, Ratings, VoteRecord};

    /// Fails the first `failures` calls with `error`, then delegates.
    struct FlakyVotes {
        inner: InMemoryRepository,
        failures: usize,
        error: fn() -> RepositoryError,
        calls: AtomicUsize,
    }

    impl FlakyVotes {
        fn new(inner: InMemoryRepository, failures: usize, error: fn() -> RepositoryError) -> Self {
            Self {
                inner,
                failures,
                error,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VotesRepository for FlakyVotes {
        async fn cast_vote(
            &self,
            user_id: &str,
            review_id: &str,
            direction: Direction,
        ) -> Result<VoteOutcome, RepositoryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err((self.error)());
            }
            self.inner.cast_vote(user_id, review_id, direction).await
        }

        async fn get_vote(
            &self,
            user_id: &str,
            review_id: &str,
        ) -> Result<Option<VoteRecord>, RepositoryError> {
            self.inner.get_vote(user_id, review_id).await
        }

        async fn tally_votes(&self, review_id: &str) -> Result<VoteCounts, RepositoryError> {
            self.inner.tally_votes(review_id).await
        }
    }

    fn conflict() -> RepositoryError {
        RepositoryError::Conflict("could not serialize access".to_string())
    }

    fn unavailable() -> RepositoryError {
        RepositoryError::Unavailable("pool timed out".to_string())
    }

    fn invalid_direction() -> RepositoryError {
        RepositoryError::InvalidDirection(9)
    }

    fn commit_outcome_unknown() -> RepositoryError {
        RepositoryError::CommitOutcomeUnknown("connection reset".to_string())
    }

    async fn repository_with_review(review_id: &str) -> InMemoryRepository {
        let repository = InMemoryRepository::new();
        repository
            .create_review(
                review_id,
                &NewReview {
                    coach_id: "coach-1".to_string(),
                    school_id: "school-1".to_string(),
                    reviewer_id: "author".to_string(),
                    ratings: Ratings {
                        sport_knowledge: 4,
                        management_skills: 4,
                        likability: 4,
                    },
                    comment: "Solid".to_string(),
                },
            )
            .await
            .unwrap();
        repository
    }

    async fn ledger_with_review(review_id: &str) -> (VoteLedger, Arc<InMemoryRepository>) {
        let repository = Arc::new(repository_with_review(review_id).await);
        let ledger = VoteLedger::new(repository.clone(), RetryPolicy::default());
        (ledger, repository)
    }

    #[tokio::test]
    async fn test_scenario_like_toggle_and_switch() {
        let (ledger, repository) = ledger_with_review("R1").await;

        let counts = ledger.cast_vote(Some("U1"), "R1", Some("like")).await.unwrap();
        assert_eq!(counts, VoteCounts::new(1, 0));
        assert_eq!(
            ledger.current_vote(Some("U1"), "R1").await.unwrap(),
            Some(Direction::Like)
        );

        let counts = ledger.cast_vote(Some("U1"), "R1", Some("like")).await.unwrap();
        assert_eq!(counts, VoteCounts::new(0, 0));
        assert!(repository.get_vote("U1", "R1").await.unwrap().is_none());

        ledger.cast_vote(Some("U1"), "R1", Some("like")).await.unwrap();
        let counts = ledger.cast_vote(Some("U1"), "R1", Some("dislike")).await.unwrap();
        assert_eq!(counts, VoteCounts::new(0, 1));
        assert_eq!(
            ledger.current_vote(Some("U1"), "R1").await.unwrap(),
            Some(Direction::Dislike)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_likes_from_two_users() {
        let (ledger, repository) = ledger_with_review("R1").await;
        let ledger = Arc::new(ledger);

        let first = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.cast_vote(Some("U1"), "R1", Some("like")).await })
        };
        let second = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.cast_vote(Some("U2"), "R1", Some("like")).await })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let review = repository.get_review("R1").await.unwrap().unwrap();
        assert_eq!(review.counts(), VoteCounts::new(2, 0));
    }

    #[tokio::test]
    async fn test_missing_user_is_unauthenticated() {
        let (ledger, repository) = ledger_with_review("R1").await;

        assert_eq!(
            ledger.cast_vote(None, "R1", Some("like")).await,
            Err(ServiceError::Unauthenticated)
        );
        assert_eq!(
            ledger.cast_vote(Some(""), "R1", Some("like")).await,
            Err(ServiceError::Unauthenticated)
        );
        assert_eq!(repository.tally_votes("R1").await.unwrap(), VoteCounts::default());
    }

    #[tokio::test]
    async fn test_identity_is_checked_before_action() {
        let (ledger, _) = ledger_with_review("R1").await;

        let result = ledger.cast_vote(None, "R1", Some("upvote")).await;

        assert_eq!(result, Err(ServiceError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_invalid_action_is_rejected() {
        let (ledger, repository) = ledger_with_review("R1").await;

        for action in [Some("upvote"), Some("LIKE"), Some(""), None] {
            let result = ledger.cast_vote(Some("U1"), "R1", action).await;
            assert!(matches!(result, Err(ServiceError::InvalidArgument(_))));
        }
        assert!(repository.get_vote("U1", "R1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_review_is_not_found() {
        let (ledger, repository) = ledger_with_review("R1").await;

        let result = ledger
            .cast_vote(Some("U1"), "nonexistent-review", Some("like"))
            .await;

        assert!(matches!(result, Err(ServiceError::NotFound(_))));
        assert!(repository.get_vote("U1", "nonexistent-review").await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_conflict_is_retried_until_applied() {
        let votes = Arc::new(FlakyVotes::new(repository_with_review("R1").await, 2, conflict));
        let ledger = VoteLedger::new(votes.clone(), RetryPolicy::default());

        let counts = ledger.cast_vote(Some("U1"), "R1", Some("like")).await.unwrap();

        assert_eq!(counts, VoteCounts::new(1, 0));
        assert_eq!(votes.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_surface_unavailable() {
        let votes = Arc::new(FlakyVotes::new(repository_with_review("R1").await, 10, unavailable));
        let policy = RetryPolicy {
            max_retries: 2,
            ..RetryPolicy::default()
        };
        let ledger = VoteLedger::new(votes.clone(), policy);

        let result = ledger.cast_vote(Some("U1"), "R1", Some("like")).await;

        assert!(matches!(result, Err(ServiceError::Unavailable(_))));
        assert_eq!(votes.calls.load(Ordering::SeqCst), 3);
        assert!(votes.inner.get_vote("U1", "R1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_non_retryable_failure_is_not_retried() {
        let votes = Arc::new(FlakyVotes::new(
            repository_with_review("R1").await,
            1,
            invalid_direction,
        ));
        let ledger = VoteLedger::new(votes.clone(), RetryPolicy::default());

        let result = ledger.cast_vote(Some("U1"), "R1", Some("dislike")).await;

        assert!(matches!(result, Err(ServiceError::Internal(_))));
        assert_eq!(votes.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retry_disabled_returns_first_conflict() {
        let votes = Arc::new(FlakyVotes::new(repository_with_review("R1").await, 1, conflict));
        let ledger = VoteLedger::new(votes.clone(), RetryPolicy::none());

        let result = ledger.cast_vote(Some("U1"), "R1", Some("like")).await;

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
        assert_eq!(votes.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_user_id_is_used_verbatim() {
        let (ledger, repository) = ledger_with_review("R1").await;

        let counts = ledger.cast_vote(Some(" U1 "), "R1", Some("like")).await.unwrap();

        assert_eq!(counts, VoteCounts::new(1, 0));
        let vote = repository.get_vote(" U1 ", "R1").await.unwrap().unwrap();
        assert_eq!(vote.direction, Direction::Like);
        assert!(repository.get_vote("U1", "R1").await.unwrap().is_none());
        assert_eq!(
            ledger.current_vote(Some(" U1 "), "R1").await.unwrap(),
            Some(Direction::Like)
        );
    }

    #[tokio::test]
    async fn test_whitespace_user_id_is_a_distinct_voter() {
        let (ledger, _) = ledger_with_review("R1").await;

        ledger.cast_vote(Some("U1"), "R1", Some("like")).await.unwrap();
        let counts = ledger.cast_vote(Some("  "), "R1", Some("like")).await.unwrap();

        assert_eq!(counts, VoteCounts::new(2, 0));
    }

    #[tokio::test]
    async fn test_unknown_commit_outcome_is_not_retried() {
        let votes = Arc::new(FlakyVotes::new(
            repository_with_review("R1").await,
            1,
            commit_outcome_unknown,
        ));
        let ledger = VoteLedger::new(votes.clone(), RetryPolicy::default());

        let result = ledger.cast_vote(Some("U1"), "R1", Some("like")).await;

        assert!(matches!(result, Err(ServiceError::Internal(_))));
        assert_eq!(votes.calls.load(Ordering::SeqCst), 1);
    }
}
