use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// A user's standing vote on a review.
///
/// At most one record exists per `(user_id, review_id)` pair; the pair is the
/// record's identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub user_id: String,
    pub review_id: String,
    pub direction: Direction,
    pub voted_at: DateTime<Utc>,
}
