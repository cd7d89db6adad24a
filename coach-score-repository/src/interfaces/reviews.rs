use coach_score_shared::types::{NewReview, Review, ReviewUpdate};

use crate::errors::RepositoryError;

/// A trait that defines the interface for storing reviews.
///
/// Counters are created at zero and are never written through this trait; only
/// `VotesRepository::cast_vote` moves them.
#[async_trait::async_trait]
pub trait ReviewsRepository: Send + Sync {
    /// Inserts a review under `review_id`.
    ///
    /// Fails with `RepositoryError::DuplicateReview` when the reviewer already
    /// reviewed the coach.
    async fn create_review(
        &self,
        review_id: &str,
        review: &NewReview,
    ) -> Result<Review, RepositoryError>;

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, RepositoryError>;

    /// Rewrites ratings and comment. Returns `None` if the review does not exist.
    async fn update_review(
        &self,
        review_id: &str,
        update: &ReviewUpdate,
    ) -> Result<Option<Review>, RepositoryError>;

    /// Deletes the review together with every vote cast on it.
    ///
    /// Returns `false` if the review did not exist.
    async fn delete_review(&self, review_id: &str) -> Result<bool, RepositoryError>;

    async fn find_review(
        &self,
        coach_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<Review>, RepositoryError>;

    /// Reviews written by `reviewer_id`, newest first.
    async fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<Review>, RepositoryError>;
}
