use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::job::JobDto;

#[derive(Debug, Clone, FromRow)]
pub struct Favorite {
    pub favorite_id: i64,
    pub candidate_id: i64,
    pub job_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteDto {
    pub favorite_id: i64,
    pub job_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<JobDto>,
}

impl FavoriteDto {
    pub fn from_favorite(favorite: Favorite, job: Option<JobDto>) -> Self {
        FavoriteDto {
            favorite_id: favorite.favorite_id,
            job_id: favorite.job_id,
            created_at: favorite.created_at,
            job,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateFavoriteRequest {
    pub job_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Batch lookup result for "is this job favorited" across many job ids at
/// once — kept distinct from the hydrated favorites listing since callers
/// (e.g. a job search results page) only need a job_id -> bool map, not
/// full favorite rows or job hydration.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteStatus {
    pub job_id: i64,
    pub favorited: bool,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteStatusesQuery {
    pub job_ids: String,
}

impl FavoriteStatusesQuery {
    pub fn parse_job_ids(&self) -> Vec<i64> {
        self.job_ids
            .split(',')
            .filter_map(|s| s.trim().parse::<i64>().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_job_ids() {
        let q = FavoriteStatusesQuery {
            job_ids: "1, 2,3, abc,4".to_string(),
        };
        assert_eq!(q.parse_job_ids(), vec![1, 2, 3, 4]);
    }
}
