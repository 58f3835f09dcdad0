//! Favoriting a job is idempotent: re-favoriting a job already on a
//! candidate's list is a no-op that still reports success, distinguished
//! from a fresh favorite only by the outcome tag the handler turns into a
//! 201 vs. 200.

use sqlx::PgPool;

use crate::error::Result;
use crate::models::favorite::{Favorite, FavoriteStatus};
use crate::services::counter::Counter;

#[derive(Debug, Clone)]
pub enum AddFavoriteOutcome {
    Added(Favorite),
    AlreadyFavorite(Favorite),
}

/// Inserts `(candidate_id, job_id)` if absent; returns the existing row
/// untouched if present. Relies on a unique index on `(candidate_id,
/// job_id)` so concurrent callers racing the same pair still converge on
/// one row.
pub async fn add(db: &PgPool, candidate_id: i64, job_id: i64) -> Result<AddFavoriteOutcome> {
    if let Some(existing) = find(db, candidate_id, job_id).await? {
        return Ok(AddFavoriteOutcome::AlreadyFavorite(existing));
    }

    let favorite_id = Counter::next(db, "favorite_id").await?;

    let inserted: Option<Favorite> = sqlx::query_as(
        "INSERT INTO favorites (favorite_id, candidate_id, job_id)
         VALUES ($1, $2, $3)
         ON CONFLICT (candidate_id, job_id) DO NOTHING
         RETURNING favorite_id, candidate_id, job_id, created_at",
    )
    .bind(favorite_id)
    .bind(candidate_id)
    .bind(job_id)
    .fetch_optional(db)
    .await?;

    match inserted {
        Some(favorite) => Ok(AddFavoriteOutcome::Added(favorite)),
        None => {
            let existing = find(db, candidate_id, job_id)
                .await?
                .expect("favorite row must exist after a conflicting concurrent insert");
            Ok(AddFavoriteOutcome::AlreadyFavorite(existing))
        }
    }
}

pub async fn remove(db: &PgPool, candidate_id: i64, job_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE candidate_id = $1 AND job_id = $2")
        .bind(candidate_id)
        .bind(job_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn find(db: &PgPool, candidate_id: i64, job_id: i64) -> Result<Option<Favorite>> {
    let row = sqlx::query_as(
        "SELECT favorite_id, candidate_id, job_id, created_at
         FROM favorites WHERE candidate_id = $1 AND job_id = $2",
    )
    .bind(candidate_id)
    .bind(job_id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool, candidate_id: i64, page: i64, limit: i64) -> Result<(Vec<Favorite>, i64)> {
    let offset = (page - 1) * limit;

    let favorites: Vec<Favorite> = sqlx::query_as(
        "SELECT favorite_id, candidate_id, job_id, created_at
         FROM favorites WHERE candidate_id = $1
         ORDER BY created_at DESC
         LIMIT $2 OFFSET $3",
    )
    .bind(candidate_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE candidate_id = $1")
        .bind(candidate_id)
        .fetch_one(db)
        .await?;

    Ok((favorites, total.0))
}

/// Batch "is this job favorited by this candidate" lookup, used by job
/// search result pages that need the status for many jobs in one call
/// instead of one favorite lookup per job.
pub async fn statuses(db: &PgPool, candidate_id: i64, job_ids: &[i64]) -> Result<Vec<FavoriteStatus>> {
    if job_ids.is_empty() {
        return Ok(Vec::new());
    }

    let favorited: Vec<(i64,)> = sqlx::query_as(
        "SELECT job_id FROM favorites WHERE candidate_id = $1 AND job_id = ANY($2)",
    )
    .bind(candidate_id)
    .bind(job_ids)
    .fetch_all(db)
    .await?;

    let favorited_set: std::collections::HashSet<i64> = favorited.into_iter().map(|(id,)| id).collect();

    Ok(job_ids
        .iter()
        .map(|&job_id| FavoriteStatus {
            job_id,
            favorited: favorited_set.contains(&job_id),
        })
        .collect())
}
