//! Error types for the Coach Score service.
//!
//! `ServiceError` is the taxonomy every service operation reports and the only
//! error type handlers return; `CoachScoreError` covers startup and shutdown.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coach_score_repository::RepositoryError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the vote ledger and review services.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No caller identity was supplied.
    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Concurrent-write contention that outlasted the retry budget.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The persistence layer could not be reached.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AlreadyExists(_) | ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to clients. Persistence details never leave the process.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Unauthenticated => self.to_string(),
            ServiceError::InvalidArgument(msg)
            | ServiceError::NotFound(msg)
            | ServiceError::AlreadyExists(msg) => msg.clone(),
            ServiceError::Conflict(_) => {
                "The request conflicted with a concurrent update, please retry".to_string()
            }
            ServiceError::Unavailable(_) => "Service temporarily unavailable".to_string(),
            ServiceError::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ReviewNotFound(review_id) => {
                Self::NotFound(format!("Review not found: {review_id}"))
            }
            RepositoryError::DuplicateReview { .. } => {
                Self::AlreadyExists("You have already reviewed this coach".to_string())
            }
            RepositoryError::Conflict(msg) => Self::Conflict(msg),
            RepositoryError::Unavailable(msg) => Self::Unavailable(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Errors that can occur while starting or running the service.
#[derive(Debug, Error)]
pub enum CoachScoreError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoachScoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
