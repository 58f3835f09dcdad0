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
        company::{Company, CompanyDto, CompanyListQuery, CreateCompanyRequest, UpdateCompanyRequest},
        job::{Job, JobDto, JobListQuery},
        pagination::Paginated,
    },
    query::{
        filter::CompanyFilters,
        parser::{self, Pagination, SortDir},
        text,
    },
    services::{actor_scope, company_ranker::CompanyRanker, counter::Counter},
    AppState,
};

const COMPANY_COLUMNS: &str = "company_id, name, description, country, state, city, address, url, \
    company_size_min, company_size_max, created_at, updated_at";

const COMPANY_SORT_FIELDS: [&str; 3] = ["name", "created_at", "company_size_min"];
const COMPANY_DEFAULT_SORT_FIELD: &str = "created_at";

fn base_filters(params: &CompanyListQuery) -> CompanyFilters {
    CompanyFilters {
        country: params.country.clone(),
        state: params.state.clone(),
        city: params.city.clone(),
        min_size: params.min_size,
        max_size: params.max_size,
    }
}

fn to_dto(company: Company, base_url: &str) -> CompanyDto {
    CompanyDto::from_company(company, Some(base_url))
}

/// `GET /api/companies`. Mirrors the job listing's dispatch: no `q` is a
/// plain filter+sort, `q` with no `sortBy` runs the composite ranker,
/// otherwise the behaviors degrade to a filter+sort since the ranker has
/// no notion of arbitrary sort fields once `q` has set relevance order.
pub async fn list_companies(State(state): State<AppState>, Query(params): Query<CompanyListQuery>) -> Result<Json<Paginated<CompanyDto>>> {
    let pagination = Pagination::parse(params.page, params.limit);
    let filters = base_filters(&params);
    let q = text::normalize_search_term(params.q.as_deref());

    match (q, params.sort_by.as_deref()) {
        (Some(q), None) => list_ranked(&state, filters, &q, pagination).await,
        _ => list_filtered_sorted(&state, filters, &params, pagination).await,
    }
}

async fn list_filtered_sorted(
    state: &AppState,
    filters: CompanyFilters,
    params: &CompanyListQuery,
    pagination: Pagination,
) -> Result<Json<Paginated<CompanyDto>>> {
    let sort_field = parser::parse_sort_field(params.sort_by.as_deref(), &COMPANY_SORT_FIELDS, COMPANY_DEFAULT_SORT_FIELD);
    let sort_dir = SortDir::parse(params.sort_dir.as_deref(), sort_field == "created_at");

    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE 1=1"));
    filters.push_predicates(&mut qb);
    qb.push(format!(
        " ORDER BY {sort_field} {} LIMIT ",
        if sort_dir == SortDir::Desc { "DESC" } else { "ASC" }
    ));
    qb.push_bind(pagination.limit);
    qb.push(" OFFSET ");
    qb.push_bind(pagination.skip());

    let companies: Vec<Company> = qb.build_query_as().fetch_all(&state.db).await?;

    let mut count_qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM companies WHERE 1=1");
    filters.push_predicates(&mut count_qb);
    let total: (i64,) = count_qb.build_query_as().fetch_one(&state.db).await?;

    let dtos = companies.into_iter().map(|c| to_dto(c, &state.config.api_base_url)).collect();
    Ok(Json(Paginated::new(pagination, total.0, dtos)))
}

async fn list_ranked(state: &AppState, filters: CompanyFilters, q: &str, pagination: Pagination) -> Result<Json<Paginated<CompanyDto>>> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE 1=1"));
    filters.push_predicates(&mut qb);

    let candidates: Vec<Company> = qb.build_query_as().fetch_all(&state.db).await?;
    let ranked = CompanyRanker::rank(candidates, q);
    let total = ranked.len() as i64;

    let page: Vec<CompanyDto> = ranked
        .into_iter()
        .skip(pagination.skip() as usize)
        .take(pagination.limit as usize)
        .map(|r| to_dto(r.company, &state.config.api_base_url))
        .collect();

    Ok(Json(Paginated::new(pagination, total, page)))
}

/// `GET /api/companies/:id`
pub async fn get_company(State(state): State<AppState>, Path(company_id): Path<i64>) -> Result<Json<CompanyDto>> {
    let company: Option<Company> = sqlx::query_as(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = $1"))
        .bind(company_id)
        .fetch_optional(&state.db)
        .await?;

    let company = company.ok_or_else(|| AppError::NotFound("company not found".to_string()))?;
    Ok(Json(to_dto(company, &state.config.api_base_url)))
}

/// `GET /api/companies/:id/jobs`
pub async fn get_company_jobs(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Paginated<JobDto>>> {
    crate::handlers::jobs::list_jobs_by_company(State(state), Path(company_id), Query(params)).await
}

/// `POST /api/companies`. Admin must supply `company_id`-less registration
/// is handled by `/api/auth/register/company`; this endpoint is admin- and
/// company-self-service creation of additional company records.
pub async fn create_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<Json<CompanyDto>> {
    payload.validate()?;
    actor_scope::require_actor(Some(&actor))?;

    let company_id = Counter::next(&state.db, "company_id").await?;

    let company: Company = sqlx::query_as(&format!(
        "INSERT INTO companies (company_id, name, description, country, state, city, address, url, \
         company_size_min, company_size_max) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10) RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(company_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(&payload.country)
    .bind(&payload.state)
    .bind(&payload.city)
    .bind(&payload.address)
    .bind(&payload.url)
    .bind(payload.company_size_min)
    .bind(payload.company_size_max)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(to_dto(company, &state.config.api_base_url)))
}

/// `PUT /api/companies/:id`
pub async fn update_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(company_id): Path<i64>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyDto>> {
    payload.validate()?;
    actor_scope::require_self_company(&actor, company_id)?;

    let mut company: Company = sqlx::query_as(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = $1"))
        .bind(company_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("company not found".to_string()))?;

    if let Some(name) = payload.name {
        company.name = name;
    }
    if let Some(description) = payload.description {
        company.description = description;
    }
    if let Some(country) = payload.country {
        company.country = country;
    }
    if let Some(s) = payload.state {
        company.state = Some(s);
    }
    if let Some(city) = payload.city {
        company.city = Some(city);
    }
    if let Some(address) = payload.address {
        company.address = Some(address);
    }
    if let Some(url) = payload.url {
        company.url = Some(url);
    }
    if payload.company_size_min.is_some() {
        company.company_size_min = payload.company_size_min;
    }
    if payload.company_size_max.is_some() {
        company.company_size_max = payload.company_size_max;
    }

    let updated: Company = sqlx::query_as(&format!(
        "UPDATE companies SET name=$1, description=$2, country=$3, state=$4, city=$5, address=$6, \
         url=$7, company_size_min=$8, company_size_max=$9, updated_at=now() WHERE company_id=$10 \
         RETURNING {COMPANY_COLUMNS}"
    ))
    .bind(&company.name)
    .bind(&company.description)
    .bind(&company.country)
    .bind(&company.state)
    .bind(&company.city)
    .bind(&company.address)
    .bind(&company.url)
    .bind(company.company_size_min)
    .bind(company.company_size_max)
    .bind(company_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(to_dto(updated, &state.config.api_base_url)))
}

/// `DELETE /api/companies/:id`
pub async fn delete_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(company_id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    actor_scope::require_self_company(&actor, company_id)?;

    let result = sqlx::query("DELETE FROM companies WHERE company_id = $1").bind(company_id).execute(&state.db).await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("company not found".to_string()));
    }

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
