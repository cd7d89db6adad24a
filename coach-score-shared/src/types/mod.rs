mod direction;
mod review;
mod vote_counts;
mod vote_record;
mod vote_transition;

pub use direction::{Direction, ParseDirectionError};
pub use review::{NewReview, Ratings, Review, ReviewUpdate, RATING_MAX, RATING_MIN};
pub use vote_counts::{CounterDelta, VoteCounts};
pub use vote_record::VoteRecord;
pub use vote_transition::{VoteOutcome, VoteTransition};
