use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The two-valued choice a vote on a review can take.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// A positive endorsement of the review.
    Like,
    /// A negative endorsement of the review.
    Dislike,
}

/// Returned when a string is neither `like` nor `dislike`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid vote direction: {0}")]
pub struct ParseDirectionError(pub String);

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Like => "like",
            Direction::Dislike => "dislike",
        }
    }

    /// Storage code persisted in the `direction` column.
    pub fn as_code(self) -> i16 {
        match self {
            Direction::Like => 0,
            Direction::Dislike => 1,
        }
    }

    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(Direction::Like),
            1 => Some(Direction::Dislike),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "like" => Ok(Direction::Like),
            "dislike" => Ok(Direction::Dislike),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
