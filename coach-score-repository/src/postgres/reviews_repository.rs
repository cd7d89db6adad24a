use async_trait::async_trait;
use coach_score_shared::types::{NewReview, Review, ReviewUpdate};

use super::{PostgresRepository, REVIEW_COLUMNS, ReviewRow};
use crate::{RepositoryError, ReviewsRepository};

#[async_trait]
impl ReviewsRepository for PostgresRepository {
    /// Inserts a review with zeroed counters.
    ///
    /// Uses `ON CONFLICT DO NOTHING` on `(coach_id, reviewer_id)` so a duplicate
    /// shows up as an empty `RETURNING` rather than a constraint error.
    async fn create_review(
        &self,
        review_id: &str,
        review: &NewReview,
    ) -> Result<Review, RepositoryError> {
        let sql = format!(
            r#"
            INSERT INTO reviews (
                review_id, coach_id, school_id, reviewer_id,
                sport_knowledge_rating, management_skills_rating, likability_rating,
                overall_rating, comment
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT ON CONSTRAINT reviews_coach_reviewer_key DO NOTHING
            RETURNING {REVIEW_COLUMNS}
            "#
        );

        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(review_id)
            .bind(&review.coach_id)
            .bind(&review.school_id)
            .bind(&review.reviewer_id)
            .bind(review.ratings.sport_knowledge)
            .bind(review.ratings.management_skills)
            .bind(review.ratings.likability)
            .bind(review.ratings.overall())
            .bind(&review.comment)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Review::from)
            .ok_or_else(|| RepositoryError::DuplicateReview {
                coach_id: review.coach_id.clone(),
                reviewer_id: review.reviewer_id.clone(),
            })
    }

    async fn get_review(&self, review_id: &str) -> Result<Option<Review>, RepositoryError> {
        let sql = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE review_id = $1");
        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(review_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Review::from))
    }

    async fn update_review(
        &self,
        review_id: &str,
        update: &ReviewUpdate,
    ) -> Result<Option<Review>, RepositoryError> {
        let sql = format!(
            r#"
            UPDATE reviews
            SET sport_knowledge_rating = $2,
                management_skills_rating = $3,
                likability_rating = $4,
                overall_rating = $5,
                comment = $6,
                updated_at = now()
            WHERE review_id = $1
            RETURNING {REVIEW_COLUMNS}
            "#
        );

        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(review_id)
            .bind(update.ratings.sport_knowledge)
            .bind(update.ratings.management_skills)
            .bind(update.ratings.likability)
            .bind(update.ratings.overall())
            .bind(&update.comment)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Review::from))
    }

    /// Deletes the review and its vote records in one transaction.
    async fn delete_review(&self, review_id: &str) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM review_votes WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await.map_err(RepositoryError::from_commit)?;
        Ok(deleted > 0)
    }

    async fn find_review(
        &self,
        coach_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE coach_id = $1 AND reviewer_id = $2"
        );
        let row: Option<ReviewRow> = sqlx::query_as(&sql)
            .bind(coach_id)
            .bind(reviewer_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Review::from))
    }

    async fn list_reviews_by_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<Review>, RepositoryError> {
        let sql = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE reviewer_id = $1 ORDER BY created_at DESC"
        );
        let rows: Vec<ReviewRow> = sqlx::query_as(&sql)
            .bind(reviewer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }
}
