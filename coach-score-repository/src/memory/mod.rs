//! In-memory implementation of the Coach Score repository.
//!
//! Every operation takes the same `tokio::sync::Mutex`, which makes each call
//! atomic with respect to every other call, mirroring the row lock the
//! PostgreSQL implementation takes per vote.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use coach_score_shared::types::{
    Direction, NewReview, Review, ReviewUpdate, VoteCounts, VoteOutcome, VoteRecord,
    VoteTransition,
};
use tokio::sync::Mutex;

use crate::{RepositoryError, ReviewsRepository, VotesRepository};

type VoteKey = (String, String);

#[derive(Default)]
struct MemoryState {
    reviews: HashMap<String, Review>,
    votes: HashMap<VoteKey, VoteRecord>,
}

/// Process-local repository holding reviews and vote records.
#[derive(Default)]
pub struct InMemoryRepository {
    state: Mutex<MemoryState>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn vote_key(user_id: &str, review_id: &str) -> VoteKey {
    (user_id.to_string(), review_id.to_string())
}

#[async_trait]
impl VotesRepository for InMemoryRepository {
    async fn cast_vote(
        &self,
        user_id: &str,
        review_id: &str,
        direction: Direction,
    ) -> Result<VoteOutcome, RepositoryError> {
        let mut state = self.state.lock().await;
        let MemoryState { reviews, votes } = &mut *state;

        let review = reviews
            .get_mut(review_id)
            .ok_or_else(|| RepositoryError::ReviewNotFound(review_id.to_string()))?;

        let key = vote_key(user_id, review_id);
        let prior = votes.get(&key).map(|vote| vote.direction);
        let transition = VoteTransition::decide(prior, direction);

        match transition.resulting_direction() {
            Some(direction) => {
                votes.insert(
                    key,
                    VoteRecord {
                        user_id: user_id.to_string(),
                        review_id: review_id.to_string(),
                        direction,
                        voted_at: Utc::now(),
                    },
                );
            }
            None => {
                votes.remove(&key);
            }
        }

        let counts = review.counts().apply(transition.counter_delta());
        review.likes = counts.likes;
        review.dislikes = counts.dislikes;

        Ok(VoteOutcome { transition, counts })
    }

    async fn get_vote(
        &self,
        user_id: &str,
        review_id: &str,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.votes.get(&vote_key(user_id, review_id)).cloned())
    }

    async fn tally_votes(&self, review_id: &str) -> Result<VoteCounts, RepositoryError> {
        let state = self.state.lock().await;
        let mut counts = VoteCounts::default();
        state
            .votes
            .values()
            .filter(|vote| vote.review_id == review_id)
            .for_each(|vote| counts.record(vote.direction));
        Ok(counts)
    }
}

#[async_trait]
impl ReviewsRepository for InMemoryRepository {
    async fn create_review(
        &self,
        review_id: &str,
        review: &NewReview,
    ) -> Result<Review, RepositoryError> {
        let mut state = self.state.lock().await;

        let duplicate = state.reviews.values().any(|existing| {
            existing.coach_id == review.coach_id && existing.reviewer_id == review.reviewer_id
        });
        if duplicate {
            return Err(RepositoryError::DuplicateReview {
                coach_id: review.coach_id.clone(),
                reviewer_id: review.reviewer_id.clone(),
            });
        }
        if state.reviews.contains_key(review_id) {
            return Err(RepositoryError::Conflict(format!(
                "review id {review_id} already in use"
            )));
        }

        let now = Utc::now();
        let stored = Review {
            review_id: review_id.to_string(),
            coach_id: review.coach_id.clone(),
            school_id: review.school_id.clone(),
            reviewer_id: review.reviewer_id.clone(),
            ratings: review.ratings,
            overall_rating: review.ratings.overall(),
            comment: review.comment.clone(),
            likes: 0,
            dislikes: 0,
            created_at: now,
            updated_at: now,
        };
        state.reviews.insert(review_id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.reviews.get(review_id).cloned())
    }

    async fn update_review(
        &self,
        review_id: &str,
        update: &ReviewUpdate,
    ) -> Result<Option<Review>, RepositoryError> {
        let mut state = self.state.lock().await;
        Ok(state.reviews.get_mut(review_id).map(|review| {
            review.ratings = update.ratings;
            review.overall_rating = update.ratings.overall();
            review.comment = update.comment.clone();
            review.updated_at = Utc::now();
            review.clone()
        }))
    }

    async fn delete_review(&self, review_id: &str) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        if state.reviews.remove(review_id).is_none() {
            return Ok(false);
        }
        state.votes.retain(|(_, voted_review), _| voted_review != review_id);
        Ok(true)
    }

    async fn find_review(
        &self,
        coach_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<Review>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .reviews
            .values()
            .find(|review| review.coach_id == coach_id && review.reviewer_id == reviewer_id)
            .cloned())
    }

    async fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<Review>, RepositoryError> {
        let state = self.state.lock().await;
        let mut reviews: Vec<Review> = state
            .reviews
            .values()
            .filter(|review| review.reviewer_id == reviewer_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
