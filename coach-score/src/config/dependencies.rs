use std::sync::Arc;

use coach_score_repository::PostgresRepository;
use tracing::info;

use crate::config::Config;
use crate::errors::CoachScoreError;
use crate::server::state::AppState;

/// `Dependencies` holds the initialized components the HTTP server runs on.
pub struct Dependencies {
    pub state: AppState,
}

impl Dependencies {
    /// Connects to PostgreSQL, applies migrations when enabled and wires the
    /// repository into the vote ledger and review service.
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` on successful initialization or a
    /// `CoachScoreError` if the database cannot be reached or migrated.
    pub async fn new(config: &Config) -> Result<Self, CoachScoreError> {
        info!(
            max_connections = config.database_max_connections,
            run_migrations = config.run_migrations,
            max_retries = config.vote_retry.max_retries,
            "Initializing dependencies"
        );

        let repository =
            PostgresRepository::connect(&config.database_url, config.database_max_connections)
                .await?;

        if config.run_migrations {
            repository.migrate().await?;
        }

        let repository = Arc::new(repository);
        let state = AppState::new(repository.clone(), repository, config.vote_retry);

        Ok(Self { state })
    }
}
