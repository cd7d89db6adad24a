use thiserror::Error;

/// SQLSTATE codes that mean the transaction lost a race and was rolled back.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

/// Represents errors that can occur within the repository.
///
/// `From<sqlx::Error>` classifies driver errors so callers can tell contention
/// and connectivity failures (both rolled back, safe to retry) apart from
/// everything else.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("Reviewer {reviewer_id} already reviewed coach {coach_id}")]
    DuplicateReview {
        coach_id: String,
        reviewer_id: String,
    },

    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid vote direction: {0}")]
    InvalidDirection(i16),

    /// `COMMIT` was sent but no answer came back; the write may or may not
    /// have been applied.
    #[error("Commit outcome unknown: {0}")]
    CommitOutcomeUnknown(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl RepositoryError {
    /// True when the failed attempt is known not to have committed and the
    /// same call may be issued again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RepositoryError::Conflict(_) | RepositoryError::Unavailable(_)
        )
    }
}

impl RepositoryError {
    /// Classifies a failed `COMMIT`.
    ///
    /// Only an error reported by the server proves the transaction was rolled
    /// back. Anything else leaves the outcome unknown and must not be retried.
    pub fn from_commit(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::Database(_) => RepositoryError::from(error),
            other => RepositoryError::CommitOutcomeUnknown(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(error: sqlx::Error) -> Self {
        let conflict = match &error {
            sqlx::Error::Database(db_error) => matches!(
                db_error.code().as_deref(),
                Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | UNIQUE_VIOLATION)
            )
            .then(|| db_error.message().to_string()),
            _ => None,
        };
        if let Some(message) = conflict {
            return RepositoryError::Conflict(message);
        }

        if matches!(
            error,
            sqlx::Error::PoolTimedOut
                | sqlx::Error::PoolClosed
                | sqlx::Error::Io(_)
                | sqlx::Error::Tls(_)
        ) {
            return RepositoryError::Unavailable(error.to_string());
        }

        RepositoryError::Database(error)
    }
}
