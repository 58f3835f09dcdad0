use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::utils::jwt;
use crate::AppState;

/// Resolves the bearer token into an `Actor` and inserts it into request
/// extensions. Routes that require an actor apply this as a
/// `route_layer`; the core itself only ever sees the already-resolved
/// `Actor` via `actor_scope::require_actor`, never raw credentials.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let claims = jwt::verify_access_token(token, &state.config).map_err(|_| StatusCode::UNAUTHORIZED)?;
    let actor = claims.to_actor().ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

/// Resolves an actor when a bearer token is present but does not reject
/// the request when it's absent — used by endpoints whose behavior
/// (scoping, favorited-by-me annotations) only changes when a caller is
/// authenticated, such as the public job listing.
pub async fn optional_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let actor = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|token| jwt::verify_access_token(token, &state.config).ok())
        .and_then(|claims| claims.to_actor());

    request.extensions_mut().insert(actor);

    next.run(request).await
}
