use serde::{Deserialize, Serialize};

use crate::types::Direction;

/// Denormalized like/dislike counters carried by a review.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteCounts {
    pub likes: i64,
    pub dislikes: i64,
}

/// Signed change applied to a review's counters by a single vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDelta {
    pub likes: i64,
    pub dislikes: i64,
}

impl VoteCounts {
    pub fn new(likes: i64, dislikes: i64) -> Self {
        Self { likes, dislikes }
    }

    pub fn apply(self, delta: CounterDelta) -> Self {
        Self {
            likes: self.likes + delta.likes,
            dislikes: self.dislikes + delta.dislikes,
        }
    }

    /// Counts one more vote in `direction`.
    pub fn record(&mut self, direction: Direction) {
        *self = self.apply(CounterDelta::single(direction, 1));
    }
}

impl CounterDelta {
    pub fn single(direction: Direction, amount: i64) -> Self {
        match direction {
            Direction::Like => Self {
                likes: amount,
                dislikes: 0,
            },
            Direction::Dislike => Self {
                likes: 0,
                dislikes: amount,
            },
        }
    }

    pub fn combine(self, other: CounterDelta) -> Self {
        Self {
            likes: self.likes + other.likes,
            dislikes: self.dislikes + other.dislikes,
        }
    }
}
