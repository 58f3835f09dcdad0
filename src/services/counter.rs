use sqlx::PgPool;

use crate::error::Result;

/// Atomic monotonic sequence generator keyed by name (`company_id`,
/// `job_id`, `candidate_id`, `application_id`, `favorite_id`, `user_id`).
/// Backed by a single `counters(name, seq)` table; both operations are a
/// single round trip so concurrent callers never observe a torn increment.
pub struct Counter;

impl Counter {
    /// Advances `name` and returns the new value. Always `> 0`; two
    /// successive calls for the same name return strictly increasing
    /// values, never reused or skipped under normal operation.
    pub async fn next(db: &PgPool, name: &str) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO counters (name, seq) VALUES ($1, 1)
             ON CONFLICT (name) DO UPDATE SET seq = counters.seq + 1
             RETURNING seq",
        )
        .bind(name)
        .fetch_one(db)
        .await?;

        Ok(row.0)
    }

    /// Maintenance operation invoked after bulk imports: sets the sequence
    /// to `max(current_seq, floor)` so the next `next()` call can't collide
    /// with an imported id.
    pub async fn sync_to(db: &PgPool, name: &str, floor: i64) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            "INSERT INTO counters (name, seq) VALUES ($1, $2)
             ON CONFLICT (name) DO UPDATE SET seq = GREATEST(counters.seq, $2)
             RETURNING seq",
        )
        .bind(name)
        .bind(floor)
        .fetch_one(db)
        .await?;

        Ok(row.0)
    }
}
