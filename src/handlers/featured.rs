use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::{
    error::{AppError, Result},
    models::{
        actor::Actor,
        company::{Company, CompanyDto},
        featured_company::FeaturedCompany,
        pagination::Paginated,
    },
    query::parser::Pagination,
    services::{actor_scope, counter::Counter},
    AppState,
};

const COMPANY_COLUMNS: &str = "company_id, name, description, country, state, city, address, url, \
    company_size_min, company_size_max, created_at, updated_at";

#[derive(Debug, serde::Deserialize)]
pub struct FeaturedListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// `GET /api/featured-companies`. Cached per page size since the listing
/// rarely changes and every client tends to request the same page.
pub async fn list_featured(
    State(state): State<AppState>,
    Query(params): Query<FeaturedListQuery>,
) -> Result<Json<Paginated<CompanyDto>>> {
    let pagination = Pagination::parse(params.page, params.limit);

    if let Some(cached) = state.featured_companies_cache.get(&pagination.limit) {
        return Ok(Json(cached));
    }

    let rows: Vec<FeaturedCompany> = sqlx::query_as("SELECT company_id, created_at FROM featured_companies ORDER BY created_at DESC LIMIT $1 OFFSET $2")
        .bind(pagination.limit)
        .bind(pagination.skip())
        .fetch_all(&state.db)
        .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM featured_companies").fetch_one(&state.db).await?;

    let mut dtos = Vec::with_capacity(rows.len());
    for featured in rows {
        let company: Option<Company> = sqlx::query_as(&format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = $1"))
            .bind(featured.company_id)
            .fetch_optional(&state.db)
            .await?;
        if let Some(company) = company {
            dtos.push(CompanyDto::from_company(company, Some(&state.config.api_base_url)));
        }
    }

    let page = Paginated::new(pagination, total.0, dtos);
    state.featured_companies_cache.insert(pagination.limit, page.clone());
    Ok(Json(page))
}

/// `POST /api/featured-companies/:id`. Admin-only; idempotent via a unique
/// constraint on `company_id`.
pub async fn feature_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    axum::extract::Path(company_id): axum::extract::Path<i64>,
) -> Result<Json<serde_json::Value>> {
    actor_scope::require_type(&actor, &[crate::models::actor::ActorType::Admin].into_iter().collect())?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT company_id FROM featured_companies WHERE company_id = $1")
        .bind(company_id)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Ok(Json(serde_json::json!({ "status": "already_featured" })));
    }

    let featured_id = Counter::next(&state.db, "featured_company_id").await?;
    sqlx::query("INSERT INTO featured_companies (featured_company_id, company_id) VALUES ($1, $2)")
        .bind(featured_id)
        .bind(company_id)
        .execute(&state.db)
        .await?;

    state.featured_companies_cache.invalidate_all();
    Ok(Json(serde_json::json!({ "status": "featured" })))
}

/// `DELETE /api/featured-companies/:id`
pub async fn unfeature_company(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    axum::extract::Path(company_id): axum::extract::Path<i64>,
) -> Result<Json<serde_json::Value>> {
    actor_scope::require_type(&actor, &[crate::models::actor::ActorType::Admin].into_iter().collect())?;

    let result = sqlx::query("DELETE FROM featured_companies WHERE company_id = $1")
        .bind(company_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("company is not featured".to_string()));
    }

    state.featured_companies_cache.invalidate_all();
    Ok(Json(serde_json::json!({ "status": "unfeatured" })))
}
