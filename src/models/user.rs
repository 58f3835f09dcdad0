use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::actor::ActorType;

/// Credential record backing the auth endpoints retained for completeness.
/// `company_id`/`candidate_id` pin the account to the entity it acts for;
/// an admin account has neither.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub actor_type: String,
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn actor_type(&self) -> Option<ActorType> {
        match self.actor_type.as_str() {
            "admin" => Some(ActorType::Admin),
            "company" => Some(ActorType::Company),
            "candidate" => Some(ActorType::Candidate),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub email: String,
    pub actor_type: String,
    pub company_id: Option<i64>,
    pub candidate_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            user_id: user.user_id,
            email: user.email,
            actor_type: user.actor_type,
            company_id: user.company_id,
            candidate_id: user.candidate_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCandidateRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCompanyRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub company_name: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}
