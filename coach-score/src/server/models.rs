// Request and response bodies of the HTTP API
use coach_score_shared::types::{Direction, NewReview, Ratings};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /reviews/:review_id/votes`.
///
/// Fields are kept as raw JSON so that a missing caller is reported as
/// unauthenticated before the action's type or value is looked at.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub user_id: Option<Value>,
    pub action: Option<Value>,
}

impl VoteRequest {
    /// Caller id as sent. Non-string ids are used in their JSON form; `null`,
    /// `false`, `0` and `""` count as absent.
    pub fn caller_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The action if it is a string; anything else is treated as missing.
    pub fn action(&self) -> Option<&str> {
        self.action.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentVoteResponse {
    pub direction: Option<Direction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub coach_id: String,
    #[serde(default)]
    pub school_id: String,
    pub ratings: Ratings,
    #[serde(default)]
    pub comment: String,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(request: CreateReviewRequest) -> Self {
        NewReview {
            coach_id: request.coach_id,
            school_id: request.school_id,
            reviewer_id: request.user_id,
            ratings: request.ratings,
            comment: request.comment,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewResponse {
    pub review_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasReviewedQuery {
    #[serde(default)]
    pub coach_id: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasReviewedResponse {
    pub has_reviewed: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
