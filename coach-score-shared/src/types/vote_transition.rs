use std::fmt;

use crate::types::{CounterDelta, Direction, VoteCounts};

/// The change a single vote makes to a `(user, review)` pair.
///
/// Computed from the durable prior state at call time; there is no state carried
/// between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No prior vote: a record is inserted.
    Create(Direction),
    /// The same direction was repeated: the record is deleted.
    Retract(Direction),
    /// The opposite direction was cast: the record is rewritten.
    Switch { from: Direction, to: Direction },
}

impl VoteTransition {
    /// Decides the transition for a `requested` vote given the `prior` stored direction.
    pub fn decide(prior: Option<Direction>, requested: Direction) -> Self {
        match prior {
            None => VoteTransition::Create(requested),
            Some(existing) if existing == requested => VoteTransition::Retract(requested),
            Some(existing) => VoteTransition::Switch {
                from: existing,
                to: requested,
            },
        }
    }

    pub fn counter_delta(&self) -> CounterDelta {
        match *self {
            VoteTransition::Create(direction) => CounterDelta::single(direction, 1),
            VoteTransition::Retract(direction) => CounterDelta::single(direction, -1),
            VoteTransition::Switch { from, to } => {
                CounterDelta::single(from, -1).combine(CounterDelta::single(to, 1))
            }
        }
    }

    /// Direction held by the vote record once the transition is applied.
    pub fn resulting_direction(&self) -> Option<Direction> {
        match *self {
            VoteTransition::Create(direction) => Some(direction),
            VoteTransition::Retract(_) => None,
            VoteTransition::Switch { to, .. } => Some(to),
        }
    }
}

impl fmt::Display for VoteTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteTransition::Create(direction) => write!(f, "create({direction})"),
            VoteTransition::Retract(direction) => write!(f, "retract({direction})"),
            VoteTransition::Switch { from, to } => write!(f, "switch({from}->{to})"),
        }
    }
}

/// Result of an applied vote: the transition taken and the counters read back
/// after it was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub transition: VoteTransition,
    pub counts: VoteCounts,
}
