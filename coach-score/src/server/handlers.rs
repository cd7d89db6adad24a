// HTTP request handlers
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use coach_score_shared::types::{Review, ReviewUpdate, VoteCounts};
use tracing::debug;

use crate::errors::ServiceError;
use crate::server::models::{
    CreateReviewRequest, CreateReviewResponse, CurrentVoteResponse, HasReviewedQuery,
    HasReviewedResponse, MessageResponse, VoteQuery, VoteRequest,
};
use crate::server::state::AppState;

/// Unwraps a JSON body, reporting malformed input as an invalid argument.
fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ServiceError::invalid(rejection.body_text()))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Coach Score is running")
}

/// Casts, switches or retracts the caller's vote and returns the new counters.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteCounts>, ServiceError> {
    let request = body(payload)?;
    debug!(review_id = %review_id, action = ?request.action, "Received vote request");

    let caller_id = request.caller_id();
    let counts = state
        .ledger
        .cast_vote(caller_id.as_deref(), &review_id, request.action())
        .await?;
    Ok(Json(counts))
}

pub async fn current_vote(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    Query(query): Query<VoteQuery>,
) -> Result<Json<CurrentVoteResponse>, ServiceError> {
    let direction = state
        .ledger
        .current_vote(query.user_id.as_deref(), &review_id)
        .await?;
    Ok(Json(CurrentVoteResponse { direction }))
}

pub async fn create_review(
    State(state): State<AppState>,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = body(payload)?;
    let review = state.reviews.create_review(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateReviewResponse {
            review_id: review.review_id,
        }),
    ))
}

pub async fn has_reviewed(
    State(state): State<AppState>,
    Query(query): Query<HasReviewedQuery>,
) -> Result<Json<HasReviewedResponse>, ServiceError> {
    let has_reviewed = state
        .reviews
        .has_reviewed(&query.coach_id, &query.user_id)
        .await?;
    Ok(Json(HasReviewedResponse { has_reviewed }))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<Review>, ServiceError> {
    Ok(Json(state.reviews.get_review(&review_id).await?))
}

pub async fn update_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    payload: Result<Json<ReviewUpdate>, JsonRejection>,
) -> Result<Json<Review>, ServiceError> {
    let update = body(payload)?;
    Ok(Json(state.reviews.update_review(&review_id, update).await?))
}

pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<Json<MessageResponse>, ServiceError> {
    state.reviews.delete_review(&review_id).await?;
    Ok(Json(MessageResponse {
        message: "Review deleted successfully".to_string(),
    }))
}

pub async fn reviews_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<Review>>, ServiceError> {
    Ok(Json(state.reviews.reviews_by_user(&user_id).await?))
}
