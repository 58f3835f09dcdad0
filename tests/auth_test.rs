mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use jobboard_backend::handlers::auth;
use serde_json::json;
use tower::ServiceExt;

fn test_router(state: jobboard_backend::AppState) -> Router {
    Router::new()
        .route("/auth/register/candidate", post(auth::register_candidate))
        .route("/auth/register/company", post(auth::register_company))
        .route("/auth/login", post(auth::login))
        .with_state(state)
}

#[tokio::test]
async fn register_candidate_success() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let payload = json!({
        "email": "newcandidate@test.com",
        "password": "SecurePass123",
        "full_name": "New Candidate",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let auth_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(auth_response["access_token"].is_string());
    assert_eq!(auth_response["user"]["email"], "newcandidate@test.com");
    assert_eq!(auth_response["user"]["actor_type"], "candidate");
}

#[tokio::test]
async fn register_company_success() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let payload = json!({
        "email": "hr@newcompany.com",
        "password": "SecurePass123",
        "company_name": "New Company",
        "country": "United States",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/company")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let auth_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(auth_response["access_token"].is_string());
    assert_eq!(auth_response["user"]["actor_type"], "company");
    assert!(auth_response["user"]["company_id"].is_i64());
}

#[tokio::test]
async fn register_duplicate_email_is_conflict() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let payload = json!({
        "email": "duplicate@test.com",
        "password": "SecurePass123",
        "full_name": "First User",
    });

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let payload2 = json!({
        "email": "duplicate@test.com",
        "password": "AnotherPass456",
        "full_name": "Second User",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload2).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let payload = json!({
        "email": "shortpass@test.com",
        "password": "short",
        "full_name": "Short Pass",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_success() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let register_payload = json!({
        "email": "testuser@test.com",
        "password": "TestPassword123",
        "full_name": "Test User",
    });

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&register_payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let login_payload = json!({
        "email": "testuser@test.com",
        "password": "TestPassword123",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&login_payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let auth_response: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(auth_response["access_token"].is_string());
    assert_eq!(auth_response["user"]["email"], "testuser@test.com");
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let register_payload = json!({
        "email": "user@test.com",
        "password": "CorrectPassword",
        "full_name": "Some User",
    });

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register/candidate")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&register_payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let login_payload = json!({
        "email": "user@test.com",
        "password": "WrongPassword",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&login_payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_nonexistent_user_is_unauthorized() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let payload = json!({
        "email": "nonexistent@test.com",
        "password": "SomePassword",
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
