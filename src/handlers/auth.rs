use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::{
    error::{AppError, Result},
    models::{
        actor::Actor,
        user::{AuthResponse, LoginRequest, RegisterCandidateRequest, RegisterCompanyRequest, User, UserResponse},
    },
    services::counter::Counter,
    utils::{jwt, password},
    AppState,
};

const USER_COLUMNS: &str = "user_id, email, password_hash, actor_type, company_id, candidate_id, created_at";

async fn issue_token(state: &AppState, user: User) -> Result<Json<AuthResponse>> {
    let actor_type = user.actor_type().ok_or_else(|| AppError::Internal("unrecognized actor_type on user row".to_string()))?;

    let (access_token, expires_in) =
        jwt::create_access_token(user.user_id, &user.email, actor_type, user.company_id, user.candidate_id, &state.config)?;

    Ok(Json(AuthResponse {
        user: UserResponse::from(user),
        access_token,
        token_type: "Bearer".to_string(),
        expires_in,
    }))
}

async fn email_taken(db: &sqlx::PgPool, email: &str) -> Result<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM users WHERE email = $1").bind(email).fetch_optional(db).await?;
    Ok(row.is_some())
}

/// `POST /api/auth/register/candidate`
pub async fn register_candidate(State(state): State<AppState>, Json(payload): Json<RegisterCandidateRequest>) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    if email_taken(&state.db, &payload.email).await? {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;

    let candidate_id = Counter::next(&state.db, "candidate_id").await?;
    sqlx::query("INSERT INTO candidates (candidate_id, full_name, contact_email) VALUES ($1, $2, $3)")
        .bind(candidate_id)
        .bind(&payload.full_name)
        .bind(&payload.email)
        .execute(&mut *tx)
        .await?;

    let user_id = Counter::next(&state.db, "user_id").await?;
    let user: User = sqlx::query_as(&format!(
        "INSERT INTO users (user_id, email, password_hash, actor_type, candidate_id) \
         VALUES ($1, $2, $3, 'candidate', $4) RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(candidate_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    issue_token(&state, user).await
}

/// `POST /api/auth/register/company`
pub async fn register_company(State(state): State<AppState>, Json(payload): Json<RegisterCompanyRequest>) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    if email_taken(&state.db, &payload.email).await? {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let password_hash = password::hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;

    let company_id = Counter::next(&state.db, "company_id").await?;
    sqlx::query("INSERT INTO companies (company_id, name, description, country) VALUES ($1, $2, '', $3)")
        .bind(company_id)
        .bind(&payload.company_name)
        .bind(&payload.country)
        .execute(&mut *tx)
        .await?;

    let user_id = Counter::next(&state.db, "user_id").await?;
    let user: User = sqlx::query_as(&format!(
        "INSERT INTO users (user_id, email, password_hash, actor_type, company_id) \
         VALUES ($1, $2, $3, 'company', $4) RETURNING {USER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(company_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    issue_token(&state, user).await
}

/// `POST /api/auth/login`
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Result<Json<AuthResponse>> {
    payload.validate()?;

    let user: Option<User> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await?;
    let user = user.ok_or_else(|| AppError::Unauthorized("invalid email or password".to_string()))?;

    if !password::verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("invalid email or password".to_string()));
    }

    issue_token(&state, user).await
}

/// `GET /api/auth/me`
pub async fn me(State(state): State<AppState>, Extension(actor): Extension<Actor>) -> Result<Json<UserResponse>> {
    let user: User = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1"))
        .bind(actor.user_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}
