use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use sqlx::{Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{
        actor::Actor,
        application::{
            Application, ApplicationDto, ApplicationListQuery, ApplicationStatus, CreateApplicationRequest, InvalidStatusResponse,
            StatusCount, UpdateApplicationStatusRequest, APPLICATION_DEFAULT_SORT_FIELD, APPLICATION_SORT_FIELDS,
        },
        job::{Job, JobDto},
        pagination::Paginated,
    },
    query::{
        filter::{apply_application_ownership, ApplicationFilters},
        parser::{self, Pagination, SortDir},
    },
    services::{actor_scope, counter::Counter, pipeline_count},
    AppState,
};

const APPLICATION_COLUMNS: &str = "application_id, job_id, candidate_id, company_id, status, applied_at, updated_at";
const JOB_COLUMNS: &str = "job_id, title, description, min_salary, max_salary, pay_period, currency, \
    listed_time, work_type, work_location_type, normalized_salary, city, state, country, company_id, \
    created_at, updated_at";

fn base_filters(params: &ApplicationListQuery) -> ApplicationFilters {
    ApplicationFilters {
        company_id: params.company_id,
        job_id: params.job_id,
        candidate_id: params.candidate_id,
        status: params.status.clone(),
        from: parser::parse_date(params.from.as_deref()),
        to: parser::parse_date(params.to.as_deref()),
    }
}

async fn hydrate_job(db: &sqlx::PgPool, application: Application) -> Result<ApplicationDto> {
    let job: Option<Job> = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
        .bind(application.job_id)
        .fetch_optional(db)
        .await?;

    Ok(ApplicationDto::from_application(application, job.map(|j| JobDto::from_job(j, None))))
}

/// `POST /api/applications`. Idempotent on `(candidate_id, job_id)`: a
/// repeat submission reports the existing row rather than erroring.
pub async fn create_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>)> {
    payload.validate()?;
    let candidate_id = actor.candidate_id.ok_or_else(|| AppError::Forbidden("only a candidate may apply".to_string()))?;

    let job: Option<(i64,)> = sqlx::query_as("SELECT company_id FROM jobs WHERE job_id = $1")
        .bind(payload.job_id)
        .fetch_optional(&state.db)
        .await?;
    let (company_id,) = job.ok_or_else(|| AppError::NotFound("job not found".to_string()))?;

    let existing: Option<Application> = sqlx::query_as(&format!(
        "SELECT {APPLICATION_COLUMNS} FROM applications WHERE candidate_id = $1 AND job_id = $2"
    ))
    .bind(candidate_id)
    .bind(payload.job_id)
    .fetch_optional(&state.db)
    .await?;

    if let Some(existing) = existing {
        let dto = hydrate_job(&state.db, existing).await?;
        return Ok((
            axum::http::StatusCode::OK,
            Json(serde_json::json!({ "status": "already_exists", "application": dto })),
        ));
    }

    let application_id = Counter::next(&state.db, "application_id").await?;

    let application: Application = sqlx::query_as(&format!(
        "INSERT INTO applications (application_id, job_id, candidate_id, company_id, status, applied_at) \
         VALUES ($1, $2, $3, $4, $5, now()) RETURNING {APPLICATION_COLUMNS}"
    ))
    .bind(application_id)
    .bind(payload.job_id)
    .bind(candidate_id)
    .bind(company_id)
    .bind(ApplicationStatus::Applied.as_str())
    .fetch_one(&state.db)
    .await?;

    let dto = hydrate_job(&state.db, application).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({ "status": "created", "application": dto })),
    ))
}

/// `GET /api/applications`. Scoped to the caller's own applications unless
/// the actor is an admin.
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<ApplicationListQuery>,
) -> Result<Json<Paginated<ApplicationDto>>> {
    let pagination = Pagination::parse(params.page, params.limit);
    let mut filters = base_filters(&params);
    apply_application_ownership(&mut filters, &actor);

    let sort_field = parser::parse_sort_field(params.sort_by.as_deref(), &APPLICATION_SORT_FIELDS, APPLICATION_DEFAULT_SORT_FIELD);
    let sort_column = match sort_field {
        "createdAt" => "applied_at",
        other => other,
    };
    let sort_dir = SortDir::parse(params.sort_dir.as_deref(), true);
    let dir = if sort_dir == SortDir::Desc { "DESC" } else { "ASC" };

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE 1=1"));
    filters.push_predicates(&mut qb);
    qb.push(format!(" ORDER BY {sort_column} {dir} LIMIT "));
    qb.push_bind(pagination.limit);
    qb.push(" OFFSET ");
    qb.push_bind(pagination.skip());

    let applications: Vec<Application> = qb.build_query_as().fetch_all(&state.db).await?;

    let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM applications WHERE 1=1");
    filters.push_predicates(&mut count_qb);
    let total: (i64,) = count_qb.build_query_as().fetch_one(&state.db).await?;

    let mut dtos = Vec::with_capacity(applications.len());
    for application in applications {
        dtos.push(hydrate_job(&state.db, application).await?);
    }

    Ok(Json(Paginated::new(pagination, total.0, dtos)))
}

#[derive(Debug, serde::Deserialize)]
pub struct PipelineCountQuery {
    pub job_id: Option<i64>,
    pub company_id: Option<i64>,
}

/// `GET /api/applications/pipeline-counts`. Zero-filled application status
/// counts scoped to a job or a company.
pub async fn pipeline_counts(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(params): Query<PipelineCountQuery>,
) -> Result<Json<Vec<StatusCount>>> {
    let mut filters = ApplicationFilters {
        job_id: params.job_id,
        company_id: params.company_id,
        ..Default::default()
    };
    apply_application_ownership(&mut filters, &actor);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT status, COUNT(*) FROM applications WHERE 1=1");
    filters.push_predicates(&mut qb);
    qb.push(" GROUP BY status");

    let rows: Vec<(String, i64)> = qb.build_query_as().fetch_all(&state.db).await?;
    let raw_counts: HashMap<String, i64> = rows.into_iter().collect();

    Ok(Json(pipeline_count::zero_filled(raw_counts)))
}

/// `PATCH /api/applications/:id/status`. An unrecognized status leaves the
/// row untouched and reports what was accepted instead.
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(application_id): Path<i64>,
    Json(payload): Json<UpdateApplicationStatusRequest>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>)> {
    let application: Option<Application> = sqlx::query_as(&format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE application_id = $1"))
        .bind(application_id)
        .fetch_optional(&state.db)
        .await?;
    let application = application.ok_or_else(|| AppError::NotFound("application not found".to_string()))?;

    actor_scope::require_application_ownership(&actor, application.candidate_id, application.company_id)?;

    let Some(status) = ApplicationStatus::from_str_loose(&payload.status) else {
        return Ok((
            axum::http::StatusCode::BAD_REQUEST,
            Json(serde_json::to_value(InvalidStatusResponse::new()).expect("serializable")),
        ));
    };

    let updated: Application = sqlx::query_as(&format!(
        "UPDATE applications SET status = $1, updated_at = now() WHERE application_id = $2 RETURNING {APPLICATION_COLUMNS}"
    ))
    .bind(status.as_str())
    .bind(application_id)
    .fetch_one(&state.db)
    .await?;

    let dto = hydrate_job(&state.db, updated).await?;
    Ok((axum::http::StatusCode::OK, Json(serde_json::to_value(dto).expect("serializable"))))
}
