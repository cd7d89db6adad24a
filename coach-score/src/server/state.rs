// App state shared by every handler
use std::sync::Arc;

use coach_score_repository::{ReviewsRepository, VotesRepository};

use crate::ledger::{RetryPolicy, VoteLedger};
use crate::reviews::ReviewService;

#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<VoteLedger>,
    pub reviews: Arc<ReviewService>,
}

impl AppState {
    pub fn new(
        votes: Arc<dyn VotesRepository>,
        reviews: Arc<dyn ReviewsRepository>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            ledger: Arc::new(VoteLedger::new(votes, retry)),
            reviews: Arc::new(ReviewService::new(reviews)),
        }
    }
}
