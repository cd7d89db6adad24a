//! Integration tests for the PostgreSQL repository implementation.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test --test postgres_integration -- --ignored`

use std::sync::Arc;
use std::time::Duration;

use coach_score_repository::{
    PostgresRepository, RepositoryError, ReviewsRepository, VotesRepository,
};
use coach_score_shared::types::{
    Direction, NewReview, Ratings, ReviewUpdate, VoteCounts, VoteTransition,
};
use sqlx::Row;

/// Creates a test review with default values.
fn make_new_review(coach_id: &str, reviewer_id: &str) -> NewReview {
    NewReview {
        coach_id: coach_id.to_string(),
        school_id: "school-1".to_string(),
        reviewer_id: reviewer_id.to_string(),
        ratings: Ratings {
            sport_knowledge: 5,
            management_skills: 4,
            likability: 3,
        },
        comment: "Great motivator".to_string(),
    }
}

async fn seeded_repository(pool: sqlx::PgPool, review_id: &str) -> PostgresRepository {
    let repository = PostgresRepository::new(pool);
    repository
        .create_review(review_id, &make_new_review("coach-1", "author"))
        .await
        .unwrap();
    repository
}

// ============================================================================
// Vote Ledger Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_first_like_on_fresh_review(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool.clone(), "R1").await;

    let outcome = repository.cast_vote("U1", "R1", Direction::Like).await.unwrap();

    assert_eq!(outcome.transition, VoteTransition::Create(Direction::Like));
    assert_eq!(outcome.counts, VoteCounts::new(1, 0));

    let row = sqlx::query("SELECT direction FROM review_votes WHERE user_id = $1 AND review_id = $2")
        .bind("U1")
        .bind("R1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(row.get::<i16, _>("direction"), 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_repeated_like_retracts_vote(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool, "R1").await;
    repository.cast_vote("U1", "R1", Direction::Like).await.unwrap();

    let outcome = repository.cast_vote("U1", "R1", Direction::Like).await.unwrap();

    assert_eq!(outcome.counts, VoteCounts::new(0, 0));
    assert!(repository.get_vote("U1", "R1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_switch_from_like_to_dislike(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool, "R1").await;
    repository.cast_vote("U1", "R1", Direction::Like).await.unwrap();

    let outcome = repository.cast_vote("U1", "R1", Direction::Dislike).await.unwrap();

    assert_eq!(outcome.counts, VoteCounts::new(0, 1));
    let vote = repository.get_vote("U1", "R1").await.unwrap().unwrap();
    assert_eq!(vote.direction, Direction::Dislike);
    assert_eq!(repository.tally_votes("R1").await.unwrap(), VoteCounts::new(0, 1));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_vote_on_missing_review_has_no_side_effects(pool: sqlx::PgPool) {
    let repository = PostgresRepository::new(pool.clone());

    let result = repository
        .cast_vote("U1", "nonexistent-review", Direction::Like)
        .await;

    assert!(matches!(result, Err(RepositoryError::ReviewNotFound(_))));
    let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review_votes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(votes, 0);
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_concurrent_likes_from_distinct_users(pool: sqlx::PgPool) {
    let repository = Arc::new(seeded_repository(pool, "R1").await);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let repository = repository.clone();
            tokio::spawn(async move {
                repository
                    .cast_vote(&format!("user-{i}"), "R1", Direction::Like)
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let review = repository.get_review("R1").await.unwrap().unwrap();
    assert_eq!(review.counts(), VoteCounts::new(20, 0));
    assert_eq!(repository.tally_votes("R1").await.unwrap(), review.counts());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_cancelled_vote_leaves_no_trace(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool.clone(), "R1").await;

    let mut blocker = pool.begin().await.unwrap();
    sqlx::query("SELECT review_id FROM reviews WHERE review_id = $1 FOR UPDATE")
        .bind("R1")
        .execute(&mut *blocker)
        .await
        .unwrap();

    let timed_out = tokio::time::timeout(
        Duration::from_millis(200),
        repository.cast_vote("U1", "R1", Direction::Like),
    )
    .await;
    assert!(timed_out.is_err());

    blocker.rollback().await.unwrap();

    assert!(repository.get_vote("U1", "R1").await.unwrap().is_none());
    let review = repository.get_review("R1").await.unwrap().unwrap();
    assert_eq!(review.counts(), VoteCounts::default());
    assert_eq!(repository.tally_votes("R1").await.unwrap(), review.counts());
}

// ============================================================================
// Review Tests
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_tables_created(pool: sqlx::PgPool) {
    let repository = PostgresRepository::new(pool);
    assert!(repository.check_tables_created().await.unwrap());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_duplicate_review_is_rejected(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool, "R1").await;

    let result = repository
        .create_review("R2", &make_new_review("coach-1", "author"))
        .await;

    assert!(matches!(result, Err(RepositoryError::DuplicateReview { .. })));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_update_review_preserves_counters(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool, "R1").await;
    repository.cast_vote("U1", "R1", Direction::Dislike).await.unwrap();

    let update = ReviewUpdate {
        ratings: Ratings {
            sport_knowledge: 2,
            management_skills: 2,
            likability: 2,
        },
        comment: "Revised".to_string(),
    };
    let review = repository.update_review("R1", &update).await.unwrap().unwrap();

    assert_eq!(review.comment, "Revised");
    assert_eq!(review.counts(), VoteCounts::new(0, 1));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_delete_review_removes_votes(pool: sqlx::PgPool) {
    let repository = seeded_repository(pool.clone(), "R1").await;
    repository.cast_vote("U1", "R1", Direction::Like).await.unwrap();
    repository.cast_vote("U2", "R1", Direction::Dislike).await.unwrap();

    assert!(repository.delete_review("R1").await.unwrap());

    let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM review_votes WHERE review_id = $1")
        .bind("R1")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(votes, 0);
    assert!(!repository.delete_review("R1").await.unwrap());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_list_reviews_by_reviewer(pool: sqlx::PgPool) {
    let repository = PostgresRepository::new(pool);
    repository
        .create_review("R1", &make_new_review("coach-1", "U9"))
        .await
        .unwrap();
    repository
        .create_review("R2", &make_new_review("coach-2", "U9"))
        .await
        .unwrap();

    let reviews = repository.list_reviews_by_reviewer("U9").await.unwrap();

    assert_eq!(reviews.len(), 2);
    assert!(repository.find_review("coach-2", "U9").await.unwrap().is_some());
}
