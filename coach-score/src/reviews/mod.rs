//! Review authoring: the reviews that votes are cast on.
use std::sync::Arc;

use coach_score_repository::ReviewsRepository;
use coach_score_shared::types::{NewReview, Ratings, Review, ReviewUpdate};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;

pub struct ReviewService {
    reviews: Arc<dyn ReviewsRepository>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewsRepository>) -> Self {
        Self { reviews }
    }

    /// Stores a new review under a fresh id. Counters start at zero.
    pub async fn create_review(&self, review: NewReview) -> Result<Review, ServiceError> {
        if review.reviewer_id.trim().is_empty() {
            return Err(ServiceError::Unauthenticated);
        }
        require("coachId", &review.coach_id)?;
        require("schoolId", &review.school_id)?;
        validate_content(&review.ratings, &review.comment)?;

        let review_id = Uuid::new_v4().to_string();
        let stored = self.reviews.create_review(&review_id, &review).await?;

        info!(
            review_id = %stored.review_id,
            coach_id = %stored.coach_id,
            reviewer_id = %stored.reviewer_id,
            "Review created"
        );
        Ok(stored)
    }

    pub async fn has_reviewed(&self, coach_id: &str, user_id: &str) -> Result<bool, ServiceError> {
        require("coachId", coach_id)?;
        require("userId", user_id)?;
        Ok(self.reviews.find_review(coach_id, user_id).await?.is_some())
    }

    pub async fn get_review(&self, review_id: &str) -> Result<Review, ServiceError> {
        self.reviews
            .get_review(review_id)
            .await?
            .ok_or_else(|| review_not_found(review_id))
    }

    pub async fn update_review(
        &self,
        review_id: &str,
        update: ReviewUpdate,
    ) -> Result<Review, ServiceError> {
        validate_content(&update.ratings, &update.comment)?;
        let review = self
            .reviews
            .update_review(review_id, &update)
            .await?
            .ok_or_else(|| review_not_found(review_id))?;

        info!(review_id, "Review updated");
        Ok(review)
    }

    /// Removes the review and every vote cast on it.
    pub async fn delete_review(&self, review_id: &str) -> Result<(), ServiceError> {
        if !self.reviews.delete_review(review_id).await? {
            return Err(review_not_found(review_id));
        }

        info!(review_id, "Review deleted");
        Ok(())
    }

    pub async fn reviews_by_user(&self, user_id: &str) -> Result<Vec<Review>, ServiceError> {
        require("userId", user_id)?;
        Ok(self.reviews.list_reviews_by_reviewer(user_id).await?)
    }
}

fn require(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::invalid(format!("{field} is required")));
    }
    Ok(())
}

fn validate_content(ratings: &Ratings, comment: &str) -> Result<(), ServiceError> {
    if let Some(field) = ratings.out_of_range() {
        return Err(ServiceError::invalid(format!(
            "{field} must be between 1 and 5"
        )));
    }
    require("comment", comment)
}

fn review_not_found(review_id: &str) -> ServiceError {
    ServiceError::not_found(format!("Review not found: {review_id}"))
}
