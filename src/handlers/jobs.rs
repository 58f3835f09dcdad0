use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use sqlx::{Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{
        actor::{Actor, ActorType},
        company::{Company, CompanyDto},
        job::{
            compute_normalized_salary, CreateJobRequest, Job, JobDto, JobListQuery, PayPeriod, UpdateJobRequest,
            JOB_DEFAULT_SORT_FIELD, JOB_SORT_FIELDS,
        },
        pagination::Paginated,
    },
    query::{
        filter::JobFilters,
        parser::{self, Pagination, SortDir},
        text,
    },
    services::{actor_scope, counter::Counter, job_ranker::JobRanker, title_suggester},
    AppState,
};

const JOB_COLUMNS: &str = "job_id, title, description, min_salary, max_salary, pay_period, currency, \
    listed_time, work_type, work_location_type, normalized_salary, city, state, country, company_id, \
    created_at, updated_at";

const COMPANY_COLUMNS: &str = "company_id, name, description, country, state, city, address, url, \
    company_size_min, company_size_max, created_at, updated_at";

fn base_filters(params: &JobListQuery) -> JobFilters {
    JobFilters {
        country: params.country.clone(),
        state: params.state.clone(),
        city: params.city.clone(),
        work_type: params.work_type.clone(),
        work_location_type: parser::parse_work_location_type(params.work_location_type.as_deref()),
        pay_period: params.pay_period.clone(),
        company_id: params.company_id,
        min_salary: params.min_salary,
        max_salary: params.max_salary,
        min_norm_salary: params.min_norm_salary,
        max_norm_salary: params.max_norm_salary,
        listed_from: parser::parse_date(params.listed_from.as_deref()),
        listed_to: parser::parse_date(params.listed_to.as_deref()),
        unsatisfiable: parser::is_unknown_work_location_type(params.work_location_type.as_deref()),
    }
}

async fn hydrate(db: &sqlx::PgPool, jobs: Vec<Job>, include_company: bool, base_url: &str) -> Result<Vec<JobDto>> {
    if !include_company || jobs.is_empty() {
        return Ok(jobs.into_iter().map(|j| JobDto::from_job(j, None)).collect());
    }

    let company_ids: Vec<i64> = jobs.iter().map(|j| j.company_id).collect::<HashSet<_>>().into_iter().collect();

    let companies: Vec<Company> = sqlx::query_as(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = ANY($1)"))
        .bind(&company_ids)
        .fetch_all(db)
        .await?;

    let dtos: HashMap<i64, CompanyDto> = companies
        .into_iter()
        .map(|c| (c.company_id, CompanyDto::from_company(c, Some(base_url))))
        .collect();

    Ok(jobs
        .into_iter()
        .map(|j| {
            let company = dtos.get(&j.company_id).cloned();
            JobDto::from_job(j, company)
        })
        .collect())
}

/// `GET /api/jobs`. Dispatches between the three ranking modes: no `q` is a
/// plain filter+sort; `q` with an explicit `sortBy` applies a text
/// predicate but still sorts by the requested field; `q` alone runs the
/// weighted hybrid ranker over the filtered candidate set.
pub async fn list_jobs(State(state): State<AppState>, Query(params): Query<JobListQuery>) -> Result<Json<Paginated<JobDto>>> {
    dispatch_list(&state, params).await
}

async fn dispatch_list(state: &AppState, params: JobListQuery) -> Result<Json<Paginated<JobDto>>> {
    let pagination = Pagination::parse(params.page, params.limit);
    let include_company = params.include_company.unwrap_or(true);
    let q = text::normalize_search_term(params.q.as_deref());
    let filters = base_filters(&params);

    match (q, params.sort_by.as_deref()) {
        (None, _) => list_filtered_sorted(state, filters, &params, pagination, include_company).await,
        (Some(q), Some(_)) => list_text_predicate_sorted(state, filters, &q, &params, pagination, include_company).await,
        (Some(q), None) => list_hybrid(state, filters, &q, pagination, include_company).await,
    }
}

async fn list_filtered_sorted(
    state: &AppState,
    filters: JobFilters,
    params: &JobListQuery,
    pagination: Pagination,
    include_company: bool,
) -> Result<Json<Paginated<JobDto>>> {
    let sort_field = parser::parse_sort_field(params.sort_by.as_deref(), &JOB_SORT_FIELDS, JOB_DEFAULT_SORT_FIELD);
    let sort_dir = SortDir::parse(params.sort_dir.as_deref(), sort_field == "listed_time");

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE 1=1"));
    filters.push_predicates(&mut qb);
    push_order_and_page(&mut qb, sort_field, sort_dir, pagination);

    let jobs: Vec<Job> = qb.build_query_as().fetch_all(&state.db).await?;
    let total = count_jobs(&state.db, &filters).await?;

    let dtos = hydrate(&state.db, jobs, include_company, &state.config.api_base_url).await?;
    Ok(Json(Paginated::new(pagination, total, dtos)))
}

async fn list_text_predicate_sorted(
    state: &AppState,
    filters: JobFilters,
    q: &str,
    params: &JobListQuery,
    pagination: Pagination,
    include_company: bool,
) -> Result<Json<Paginated<JobDto>>> {
    let sort_field = parser::parse_sort_field(params.sort_by.as_deref(), &JOB_SORT_FIELDS, JOB_DEFAULT_SORT_FIELD);
    let sort_dir = SortDir::parse(params.sort_dir.as_deref(), sort_field == "listed_time");
    // `~*` is already an unanchored, case-insensitive substring match — no `%` wildcards needed.
    let pattern = text::escape_regex(q);

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE 1=1"));
    filters.push_predicates(&mut qb);
    qb.push(" AND (title ~* ")
        .push_bind(pattern.clone())
        .push(" OR description ~* ")
        .push_bind(pattern.clone())
        .push(")");
    push_order_and_page(&mut qb, sort_field, sort_dir, pagination);

    let jobs: Vec<Job> = qb.build_query_as().fetch_all(&state.db).await?;

    let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM jobs WHERE 1=1");
    filters.push_predicates(&mut count_qb);
    count_qb
        .push(" AND (title ~* ")
        .push_bind(pattern.clone())
        .push(" OR description ~* ")
        .push_bind(pattern)
        .push(")");
    let total: (i64,) = count_qb.build_query_as().fetch_one(&state.db).await?;

    let dtos = hydrate(&state.db, jobs, include_company, &state.config.api_base_url).await?;
    Ok(Json(Paginated::new(pagination, total.0, dtos)))
}

/// Base filters are applied in storage; the text-index match stage (does
/// `q` hit the title or description at all) and the ranking both run in
/// `JobRanker::rank` — jobs with no match are dropped before `total` is
/// computed, so a `q` with no hits yields an empty page, not the whole
/// filtered table ordered by recency.
async fn list_hybrid(
    state: &AppState,
    filters: JobFilters,
    q: &str,
    pagination: Pagination,
    include_company: bool,
) -> Result<Json<Paginated<JobDto>>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE 1=1"));
    filters.push_predicates(&mut qb);

    let candidates: Vec<Job> = qb.build_query_as().fetch_all(&state.db).await?;

    let ranked = JobRanker::rank(candidates, q, Utc::now());
    let total = ranked.len() as i64;

    let page: Vec<Job> = ranked
        .into_iter()
        .skip(pagination.skip() as usize)
        .take(pagination.limit as usize)
        .map(|r| r.job)
        .collect();

    let dtos = hydrate(&state.db, page, include_company, &state.config.api_base_url).await?;
    Ok(Json(Paginated::new(pagination, total, dtos)))
}

fn push_order_and_page(qb: &mut QueryBuilder<Postgres>, sort_field: &str, sort_dir: SortDir, pagination: Pagination) {
    let column = match sort_field {
        "createdAt" => "created_at",
        other => other,
    };
    let dir = match sort_dir {
        SortDir::Asc => "ASC",
        SortDir::Desc => "DESC",
    };
    qb.push(format!(" ORDER BY {column} {dir} LIMIT "));
    qb.push_bind(pagination.limit);
    qb.push(" OFFSET ");
    qb.push_bind(pagination.skip());
}

async fn count_jobs(db: &sqlx::PgPool, filters: &JobFilters) -> Result<i64> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM jobs WHERE 1=1");
    filters.push_predicates(&mut qb);
    let row: (i64,) = qb.build_query_as().fetch_one(db).await?;
    Ok(row.0)
}

#[derive(Debug, serde::Deserialize)]
pub struct JobDetailQuery {
    pub include_company: Option<bool>,
}

/// `GET /api/jobs/:id`
pub async fn get_job(State(state): State<AppState>, Path(job_id): Path<i64>, Query(params): Query<JobDetailQuery>) -> Result<Json<JobDto>> {
    let job: Option<Job> = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;

    let job = job.ok_or_else(|| AppError::NotFound("job not found".to_string()))?;
    let include_company = params.include_company.unwrap_or(true);
    let dtos = hydrate(&state.db, vec![job], include_company, &state.config.api_base_url).await?;
    Ok(Json(dtos.into_iter().next().expect("hydrate preserves element count")))
}

/// `GET /api/jobs/company/:companyId`
pub async fn list_jobs_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(mut params): Query<JobListQuery>,
) -> Result<Json<Paginated<JobDto>>> {
    params.company_id = Some(company_id);
    dispatch_list(&state, params).await
}

#[derive(Debug, Serialize)]
pub struct FilterOptions {
    pub work_types: Vec<String>,
    pub work_location_types: Vec<String>,
    pub pay_periods: Vec<String>,
}

/// `GET /api/jobs/filters/options`. Cached with a short TTL since these
/// distincts only change as new jobs are created.
pub async fn filter_options(State(state): State<AppState>) -> Result<Json<FilterOptions>> {
    const CACHE_KEY: &str = "job_filter_options";

    if let Some(cached) = state.filter_options_cache.get(&CACHE_KEY) {
        return Ok(Json(serde_json::from_value(cached).map_err(|e| AppError::Internal(e.to_string()))?));
    }

    let work_types: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT work_type FROM jobs WHERE work_type IS NOT NULL ORDER BY work_type")
        .fetch_all(&state.db)
        .await?;
    let work_location_types: Vec<(String,)> = sqlx::query_as(
        "SELECT DISTINCT work_location_type FROM jobs WHERE work_location_type IS NOT NULL ORDER BY work_location_type",
    )
    .fetch_all(&state.db)
    .await?;
    let pay_periods: Vec<(String,)> = sqlx::query_as("SELECT DISTINCT pay_period FROM jobs WHERE pay_period IS NOT NULL ORDER BY pay_period")
        .fetch_all(&state.db)
        .await?;

    let options = FilterOptions {
        work_types: work_types.into_iter().map(|(v,)| v).collect(),
        work_location_types: work_location_types.into_iter().map(|(v,)| v).collect(),
        pay_periods: pay_periods.into_iter().map(|(v,)| v).collect(),
    };

    let value = serde_json::to_value(&options).map_err(|e| AppError::Internal(e.to_string()))?;
    state.filter_options_cache.insert(CACHE_KEY, value);

    Ok(Json(options))
}

#[derive(Debug, serde::Deserialize)]
pub struct TitleSuggestQuery {
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TitleSuggestResponse {
    pub query: String,
    pub suggestions: Vec<String>,
}

/// `GET /api/jobs/recommendations/titles`
pub async fn recommend_titles(State(state): State<AppState>, Query(params): Query<TitleSuggestQuery>) -> Result<Json<TitleSuggestResponse>> {
    let titles: Vec<(String,)> = sqlx::query_as("SELECT title FROM jobs").fetch_all(&state.db).await?;
    let titles: Vec<String> = titles.into_iter().map(|(t,)| t).collect();

    let suggestions = title_suggester::suggest(&titles, &params.q, params.limit);

    Ok(Json(TitleSuggestResponse {
        query: params.q,
        suggestions,
    }))
}

/// `POST /api/jobs`. Admin must supply `company_id`; a company actor is
/// always the owner of the job it creates.
pub async fn create_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateJobRequest>,
) -> Result<Json<JobDto>> {
    payload.validate()?;

    let allowed: HashSet<_> = [ActorType::Admin, ActorType::Company].into_iter().collect();
    actor_scope::require_type(&actor, &allowed)?;

    let company_id = if actor.is_admin() {
        payload
            .company_id
            .ok_or_else(|| AppError::BadRequest("admin must supply company_id".to_string()))?
    } else {
        actor.company_id.ok_or_else(|| AppError::Forbidden("company actor has no company_id".to_string()))?
    };

    let pay_period = payload.pay_period.as_deref().and_then(PayPeriod::from_str_loose);
    let normalized_salary = compute_normalized_salary(payload.min_salary, payload.max_salary, pay_period);

    let job_id = Counter::next(&state.db, "job_id").await?;

    let job: Job = sqlx::query_as(&format!(
        "INSERT INTO jobs (job_id, title, description, min_salary, max_salary, pay_period, currency, \
         work_type, work_location_type, normalized_salary, city, state, country, company_id, listed_time) \
         VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13,$14, now()) RETURNING {JOB_COLUMNS}"
    ))
    .bind(job_id)
    .bind(&payload.title)
    .bind(&payload.description)
    .bind(payload.min_salary)
    .bind(payload.max_salary)
    .bind(&payload.pay_period)
    .bind(&payload.currency)
    .bind(&payload.work_type)
    .bind(&payload.work_location_type)
    .bind(normalized_salary)
    .bind(&payload.city)
    .bind(&payload.state)
    .bind(&payload.country)
    .bind(company_id)
    .fetch_one(&state.db)
    .await?;

    state.filter_options_cache.invalidate_all();

    Ok(Json(JobDto::from_job(job, None)))
}

/// `PUT /api/jobs/:id`. Recomputes `normalized_salary` whenever any of
/// `min_salary`/`max_salary`/`pay_period` changes.
pub async fn update_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<i64>,
    Json(payload): Json<UpdateJobRequest>,
) -> Result<Json<JobDto>> {
    payload.validate()?;

    let mut job: Job = sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = $1"))
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("job not found".to_string()))?;

    actor_scope::require_self_company(&actor, job.company_id)?;

    if let Some(title) = payload.title {
        job.title = title;
    }
    if let Some(description) = payload.description {
        job.description = description;
    }
    if payload.min_salary.is_some() {
        job.min_salary = payload.min_salary;
    }
    if payload.max_salary.is_some() {
        job.max_salary = payload.max_salary;
    }
    if let Some(pay_period) = payload.pay_period {
        job.pay_period = Some(pay_period);
    }
    if let Some(currency) = payload.currency {
        job.currency = Some(currency);
    }
    if let Some(work_type) = payload.work_type {
        job.work_type = Some(work_type);
    }
    if let Some(work_location_type) = payload.work_location_type {
        job.work_location_type = Some(work_location_type);
    }
    if let Some(city) = payload.city {
        job.city = Some(city);
    }
    if let Some(s) = payload.state {
        job.state = Some(s);
    }
    if let Some(country) = payload.country {
        job.country = Some(country);
    }

    job.recompute_normalized_salary();

    let updated: Job = sqlx::query_as(&format!(
        "UPDATE jobs SET title=$1, description=$2, min_salary=$3, max_salary=$4, pay_period=$5, \
         currency=$6, work_type=$7, work_location_type=$8, normalized_salary=$9, city=$10, \
         state=$11, country=$12, updated_at=now() WHERE job_id=$13 RETURNING {JOB_COLUMNS}"
    ))
    .bind(&job.title)
    .bind(&job.description)
    .bind(job.min_salary)
    .bind(job.max_salary)
    .bind(&job.pay_period)
    .bind(&job.currency)
    .bind(&job.work_type)
    .bind(&job.work_location_type)
    .bind(job.normalized_salary)
    .bind(&job.city)
    .bind(&job.state)
    .bind(&job.country)
    .bind(job_id)
    .fetch_one(&state.db)
    .await?;

    state.filter_options_cache.invalidate_all();

    Ok(Json(JobDto::from_job(updated, None)))
}

/// `DELETE /api/jobs/:id`
pub async fn delete_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT company_id FROM jobs WHERE job_id = $1")
        .bind(job_id)
        .fetch_optional(&state.db)
        .await?;

    let (company_id,) = row.ok_or_else(|| AppError::NotFound("job not found".to_string()))?;
    actor_scope::require_self_company(&actor, company_id)?;

    sqlx::query("DELETE FROM jobs WHERE job_id = $1").bind(job_id).execute(&state.db).await?;
    state.filter_options_cache.invalidate_all();

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
