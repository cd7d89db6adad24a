use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::VoteCounts;

pub const RATING_MIN: i16 = 1;
pub const RATING_MAX: i16 = 5;

/// The three star ratings a reviewer gives a coach.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub sport_knowledge: i16,
    pub management_skills: i16,
    pub likability: i16,
}

impl Ratings {
    /// Arithmetic mean of the three ratings.
    pub fn overall(&self) -> f64 {
        f64::from(self.sport_knowledge + self.management_skills + self.likability) / 3.0
    }

    /// Name of the first rating outside `RATING_MIN..=RATING_MAX`, if any.
    pub fn out_of_range(&self) -> Option<&'static str> {
        [
            ("sportKnowledge", self.sport_knowledge),
            ("managementSkills", self.management_skills),
            ("likability", self.likability),
        ]
        .into_iter()
        .find(|(_, value)| !(RATING_MIN..=RATING_MAX).contains(value))
        .map(|(name, _)| name)
    }
}

/// Input for authoring a review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub coach_id: String,
    pub school_id: String,
    pub reviewer_id: String,
    pub ratings: Ratings,
    pub comment: String,
}

/// Editable part of an existing review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewUpdate {
    pub ratings: Ratings,
    pub comment: String,
}

/// A stored review together with its vote counters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub review_id: String,
    pub coach_id: String,
    pub school_id: String,
    pub reviewer_id: String,
    pub ratings: Ratings,
    pub overall_rating: f64,
    pub comment: String,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn counts(&self) -> VoteCounts {
        VoteCounts::new(self.likes, self.dislikes)
    }
}
