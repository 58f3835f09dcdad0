use axum::{
    extract::{Path, State},
    Extension, Json,
};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{
        actor::Actor,
        candidate::{Candidate, CandidateDto, UpdateCandidateRequest},
    },
    services::actor_scope,
    AppState,
};

const CANDIDATE_COLUMNS: &str = "candidate_id, full_name, contact_email, contact_phone, \
    contact_linkedin_url, country, state, city, headline, created_at";

async fn load(db: &sqlx::PgPool, candidate_id: i64) -> Result<Candidate> {
    sqlx::query_as(&format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE candidate_id = $1"))
        .bind(candidate_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound("candidate not found".to_string()))
}

/// `GET /api/candidates/:id`. Admin, the candidate themself, or a company
/// that has received an application from this candidate may view the
/// profile.
pub async fn get_candidate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(candidate_id): Path<i64>,
) -> Result<Json<CandidateDto>> {
    let allowed = if actor.is_admin() || actor.candidate_id == Some(candidate_id) {
        true
    } else if let Some(company_id) = actor.company_id {
        actor_scope::company_can_view_candidate(&state.db, company_id, candidate_id).await?
    } else {
        false
    };

    if !allowed {
        return Err(AppError::Forbidden("not permitted to view this candidate".to_string()));
    }

    let candidate = load(&state.db, candidate_id).await?;
    Ok(Json(CandidateDto::from(candidate)))
}

/// `PUT /api/candidates/:id`
pub async fn update_candidate(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(candidate_id): Path<i64>,
    Json(payload): Json<UpdateCandidateRequest>,
) -> Result<Json<CandidateDto>> {
    payload.validate()?;
    actor_scope::require_self_candidate(&actor, candidate_id)?;

    let mut candidate = load(&state.db, candidate_id).await?;

    if let Some(full_name) = payload.full_name {
        candidate.full_name = full_name;
    }
    if let Some(email) = payload.email {
        candidate.contact_email = email;
    }
    if payload.phone.is_some() {
        candidate.contact_phone = payload.phone;
    }
    if payload.linkedin_url.is_some() {
        candidate.contact_linkedin_url = payload.linkedin_url;
    }
    if let Some(country) = payload.country {
        candidate.country = Some(country);
    }
    if payload.state.is_some() {
        candidate.state = payload.state;
    }
    if payload.city.is_some() {
        candidate.city = payload.city;
    }
    if payload.headline.is_some() {
        candidate.headline = payload.headline;
    }

    let updated: Candidate = sqlx::query_as(&format!(
        "UPDATE candidates SET full_name = $1, contact_email = $2, contact_phone = $3, \
         contact_linkedin_url = $4, country = $5, state = $6, city = $7, headline = $8 \
         WHERE candidate_id = $9 RETURNING {CANDIDATE_COLUMNS}"
    ))
    .bind(&candidate.full_name)
    .bind(&candidate.contact_email)
    .bind(&candidate.contact_phone)
    .bind(&candidate.contact_linkedin_url)
    .bind(&candidate.country)
    .bind(&candidate.state)
    .bind(&candidate.city)
    .bind(&candidate.headline)
    .bind(candidate_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(CandidateDto::from(updated)))
}
