use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{
        actor::Actor,
        favorite::{FavoriteDto, FavoriteListQuery, FavoriteStatus, FavoriteStatusesQuery},
        job::{Job, JobDto},
        pagination::Paginated,
    },
    query::parser::Pagination,
    services::favorites,
    AppState,
};

const JOB_COLUMNS: &str = "job_id, title, description, min_salary, max_salary, pay_period, currency, \
    listed_time, work_type, work_location_type, normalized_salary, city, state, country, company_id, \
    created_at, updated_at";

/// `POST /api/favorites/:jobId`. 201 on a fresh favorite, 200 when the job
/// was already on the candidate's list.
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<i64>,
) -> Result<(axum::http::StatusCode, Json<FavoriteDto>)> {
    let candidate_id = actor.candidate_id.ok_or_else(|| AppError::Forbidden("only a candidate may favorite a job".to_string()))?;

    let job: Option<Job> = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;
    let job = job.ok_or_else(|| AppError::NotFound("job not found".to_string()))?;

    let outcome = favorites::add(&state.db, candidate_id, job_id).await?;

    let (status, favorite) = match outcome {
        favorites::AddFavoriteOutcome::Added(f) => (axum::http::StatusCode::CREATED, f),
        favorites::AddFavoriteOutcome::AlreadyFavorite(f) => (axum::http::StatusCode::OK, f),
    };

    Ok((status, Json(FavoriteDto::from_favorite(favorite, Some(JobDto::from_job(job, None))))))
}

/// `DELETE /api/favorites/:jobId`
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let candidate_id = actor.candidate_id.ok_or_else(|| AppError::Forbidden("only a candidate may unfavorite a job".to_string()))?;

    let removed = favorites::remove(&state.db, candidate_id, job_id).await?;
    if !removed {
        return Err(AppError::NotFound("favorite not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "status": "removed" })))
}

/// `GET /api/favorites`
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<FavoriteListQuery>,
) -> Result<Json<Paginated<FavoriteDto>>> {
    let candidate_id = actor.candidate_id.ok_or_else(|| AppError::Forbidden("only a candidate has favorites".to_string()))?;

    let pagination = Pagination::parse(params.page, params.limit);
    let (rows, total) = favorites::list(&state.db, candidate_id, pagination.page, pagination.limit).await?;

    let mut dtos = Vec::with_capacity(rows.len());
    for favorite in rows {
        let job: Option<Job> = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
            .bind(favorite.job_id)
            .fetch_optional(&state.db)
            .await?;
        dtos.push(FavoriteDto::from_favorite(favorite, job.map(|j| JobDto::from_job(j, None))));
    }

    Ok(Json(Paginated::new(pagination, total, dtos)))
}

/// `GET /api/favorites/status?jobIds=1,2,3`. Batch favorited-state lookup
/// for a set of jobs, as used by a job search results page.
pub async fn favorite_statuses(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<FavoriteStatusesQuery>,
) -> Result<Json<Vec<FavoriteStatus>>> {
    let candidate_id = actor.candidate_id.ok_or_else(|| AppError::Forbidden("only a candidate has favorites".to_string()))?;
    let job_ids = params.parse_job_ids();
    Ok(Json(favorites::statuses(&state.db, candidate_id, &job_ids).await?))
}
