//! Coach Score service.
//!
//! Hosts the vote ledger for coach reviews behind an HTTP API: each user holds
//! at most one like or dislike per review, and the review's denormalized
//! counters move in the same atomic step as the vote itself.
pub mod config;
pub mod errors;
pub mod ledger;
pub mod reviews;
pub mod server;

pub use config::{Config, Dependencies, LogFormat};
pub use errors::{CoachScoreError, ServiceError};
pub use ledger::{RetryPolicy, VoteLedger};
pub use reviews::ReviewService;
pub use server::state::AppState;
