use async_trait::async_trait;
use chrono::{DateTime, Utc};
use coach_score_shared::types::{
    CounterDelta, Direction, VoteCounts, VoteOutcome, VoteRecord, VoteTransition,
};
use sqlx::{Postgres, Transaction};
use tracing::debug;

use super::PostgresRepository;
use crate::{RepositoryError, VotesRepository};

#[derive(sqlx::FromRow)]
struct VoteRow {
    user_id: String,
    review_id: String,
    direction: i16,
    voted_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for VoteRecord {
    type Error = RepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(VoteRecord {
            user_id: row.user_id,
            review_id: row.review_id,
            direction: Direction::from_code(row.direction)
                .ok_or(RepositoryError::InvalidDirection(row.direction))?,
            voted_at: row.voted_at,
        })
    }
}

impl PostgresRepository {
    /// Locks the review row for the rest of the transaction.
    ///
    /// Returns `None` when the review does not exist.
    async fn lock_review_tx(
        &self,
        review_id: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<VoteCounts>, RepositoryError> {
        let row: Option<(i64, i64)> = sqlx::query_as(
            "SELECT likes, dislikes FROM reviews WHERE review_id = $1 FOR UPDATE",
        )
        .bind(review_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|(likes, dislikes)| VoteCounts::new(likes, dislikes)))
    }

    async fn prior_direction_tx(
        &self,
        user_id: &str,
        review_id: &str,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Option<Direction>, RepositoryError> {
        let code: Option<i16> = sqlx::query_scalar(
            "SELECT direction FROM review_votes WHERE user_id = $1 AND review_id = $2 FOR UPDATE",
        )
        .bind(user_id)
        .bind(review_id)
        .fetch_optional(&mut **tx)
        .await?;

        code.map(|code| Direction::from_code(code).ok_or(RepositoryError::InvalidDirection(code)))
            .transpose()
    }

    /// Writes the single vote record mutation the transition calls for.
    async fn write_vote_tx(
        &self,
        user_id: &str,
        review_id: &str,
        transition: &VoteTransition,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), RepositoryError> {
        let query = match *transition {
            VoteTransition::Create(direction) => sqlx::query(
                "INSERT INTO review_votes (user_id, review_id, direction, voted_at) VALUES ($1, $2, $3, now())",
            )
            .bind(user_id)
            .bind(review_id)
            .bind(direction.as_code()),
            VoteTransition::Switch { to, .. } => sqlx::query(
                "UPDATE review_votes SET direction = $3, voted_at = now() WHERE user_id = $1 AND review_id = $2",
            )
            .bind(user_id)
            .bind(review_id)
            .bind(to.as_code()),
            VoteTransition::Retract(_) => {
                sqlx::query("DELETE FROM review_votes WHERE user_id = $1 AND review_id = $2")
                    .bind(user_id)
                    .bind(review_id)
            }
        };

        query.execute(&mut **tx).await?;
        Ok(())
    }

    /// Increments the counters in place and returns their new values.
    async fn apply_delta_tx(
        &self,
        review_id: &str,
        delta: CounterDelta,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<VoteCounts, RepositoryError> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            r#"
            UPDATE reviews
            SET likes = likes + $2, dislikes = dislikes + $3
            WHERE review_id = $1
            RETURNING likes, dislikes
            "#,
        )
        .bind(review_id)
        .bind(delta.likes)
        .bind(delta.dislikes)
        .fetch_one(&mut **tx)
        .await?;

        Ok(VoteCounts::new(likes, dislikes))
    }
}

#[async_trait]
impl VotesRepository for PostgresRepository {
    /// Applies a vote inside one transaction.
    ///
    /// Any early return drops the transaction, which rolls it back, so a failed
    /// or cancelled call leaves both the vote record and the counters untouched.
    async fn cast_vote(
        &self,
        user_id: &str,
        review_id: &str,
        direction: Direction,
    ) -> Result<VoteOutcome, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let before = self
            .lock_review_tx(review_id, &mut tx)
            .await?
            .ok_or_else(|| RepositoryError::ReviewNotFound(review_id.to_string()))?;

        let prior = self.prior_direction_tx(user_id, review_id, &mut tx).await?;
        let transition = VoteTransition::decide(prior, direction);

        self.write_vote_tx(user_id, review_id, &transition, &mut tx)
            .await?;
        let counts = self
            .apply_delta_tx(review_id, transition.counter_delta(), &mut tx)
            .await?;

        tx.commit().await.map_err(RepositoryError::from_commit)?;

        debug!(
            review_id,
            before_likes = before.likes,
            before_dislikes = before.dislikes,
            likes = counts.likes,
            dislikes = counts.dislikes,
            "Vote committed"
        );

        Ok(VoteOutcome { transition, counts })
    }

    async fn get_vote(
        &self,
        user_id: &str,
        review_id: &str,
    ) -> Result<Option<VoteRecord>, RepositoryError> {
        let row: Option<VoteRow> = sqlx::query_as(
            "SELECT user_id, review_id, direction, voted_at FROM review_votes WHERE user_id = $1 AND review_id = $2",
        )
        .bind(user_id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(VoteRecord::try_from).transpose()
    }

    async fn tally_votes(&self, review_id: &str) -> Result<VoteCounts, RepositoryError> {
        let (likes, dislikes): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE direction = 0) AS likes,
                COUNT(*) FILTER (WHERE direction = 1) AS dislikes
            FROM review_votes
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(VoteCounts::new(likes, dislikes))
    }
}
