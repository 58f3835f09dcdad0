use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The six error kinds the core ever raises. The HTTP edge translates these
/// verbatim — nothing here is caught and swallowed upstream.
#[derive(Debug)]
pub enum AppError {
    /// Actor absent (401).
    Unauthorized(String),
    /// Actor present but out of scope (403).
    Forbidden(String),
    /// Malformed input: invalid id, invalid enum, invalid range (400).
    BadRequest(String),
    /// Target id does not exist; distinct from an empty list result (404).
    NotFound(String),
    /// Unique-pair violation the endpoint treats as a hard conflict (409).
    Conflict(String),
    /// Anything else (500).
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", err);
        AppError::Internal("database error occurred".to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("invalid value for {}", field))
                })
            })
            .collect();

        AppError::BadRequest(messages.join(", "))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("password hash error: {:?}", err);
        AppError::Internal("password processing error".to_string())
    }
}

impl From<crate::utils::password::PasswordError> for AppError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        tracing::error!("password error: {:?}", err);
        AppError::Internal("password processing error".to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::debug!("jwt error: {:?}", err);
        AppError::Unauthorized("invalid or expired token".to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
