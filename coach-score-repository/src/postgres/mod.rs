//! PostgreSQL implementation of the Coach Score repository.
//!
//! Provides a PostgreSQL backend for the `VotesRepository` and `ReviewsRepository`
//! traits with connection pooling and transaction safety.
//!
//! ## Database Tables
//!
//! - `reviews`: Review documents with denormalized `likes`/`dislikes` counters
//! - `review_votes`: One vote record per `(user_id, review_id)`
//!
//! Every vote is applied inside a single transaction that first takes a row
//! lock on the target review, so concurrent votes on one review are serialized
//! and a vote is never decided from a stale read.
mod reviews_repository;
mod votes_repository;

use chrono::{DateTime, Utc};
use coach_score_shared::types::{Ratings, Review};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::errors::RepositoryError;

const TABLES: [&str; 2] = ["reviews", "review_votes"];

pub(crate) const REVIEW_COLUMNS: &str = "review_id, coach_id, school_id, reviewer_id, \
     sport_knowledge_rating, management_skills_rating, likability_rating, \
     overall_rating, comment, likes, dislikes, created_at, updated_at";

/// PostgreSQL implementation of the reviews and votes repositories.
///
/// Cloning is cheap; clones share the underlying `sqlx::PgPool`.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: sqlx::PgPool,
}

impl PostgresRepository {
    /// Creates a repository over an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Opens a new pool against `database_url`.
    ///
    /// # Arguments
    ///
    /// * `database_url` - PostgreSQL connection string
    /// * `max_connections` - Upper bound on pooled connections
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresRepository)` - Ready-to-use repository instance
    /// * `Err(RepositoryError)` - The database could not be reached
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Applies the embedded migrations in `src/postgres/migrations`.
    pub async fn migrate(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("src/postgres/migrations")
            .run(&self.pool)
            .await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Checks if the tables are created in the database.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If every table exists
    pub async fn check_tables_created(&self) -> Result<bool, RepositoryError> {
        for table in TABLES {
            let table_exists: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM information_schema.tables WHERE table_name = $1)",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
            if !table_exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ReviewRow {
    review_id: String,
    coach_id: String,
    school_id: String,
    reviewer_id: String,
    sport_knowledge_rating: i16,
    management_skills_rating: i16,
    likability_rating: i16,
    overall_rating: f64,
    comment: String,
    likes: i64,
    dislikes: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            review_id: row.review_id,
            coach_id: row.coach_id,
            school_id: row.school_id,
            reviewer_id: row.reviewer_id,
            ratings: Ratings {
                sport_knowledge: row.sport_knowledge_rating,
                management_skills: row.management_skills_rating,
                likability: row.likability_rating,
            },
            overall_rating: row.overall_rating,
            comment: row.comment,
            likes: row.likes,
            dislikes: row.dislikes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
