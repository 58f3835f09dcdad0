mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use jobboard_backend::{handlers::applications, middleware::require_auth};
use serde_json::json;
use tower::ServiceExt;

fn test_router(state: jobboard_backend::AppState) -> Router {
    Router::new()
        .route("/applications", get(applications::list_applications).post(applications::create_application))
        .route("/applications/pipeline-counts", get(applications::pipeline_counts))
        .route("/applications/{id}/status", patch(applications::update_application_status))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
}

#[tokio::test]
async fn create_application_success() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let token = common::candidate_token(&state, candidate_id, "jane@test.com");

    let app = test_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(serde_json::to_string(&json!({ "job_id": job_id })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(payload["status"], "created");
    assert_eq!(payload["application"]["job_id"], job_id);
    assert_eq!(payload["application"]["status"], "APPLIED");
}

#[tokio::test]
async fn create_application_without_auth_is_unauthorized() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&json!({ "job_id": 1 })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_application_twice_is_idempotent() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let token = common::candidate_token(&state, candidate_id, "jane@test.com");

    let app = test_router(state);
    let payload = json!({ "job_id": job_id });

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["status"], "already_exists");
}

#[tokio::test]
async fn create_application_for_nonexistent_job_is_not_found() {
    let state = common::setup_test_state().await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let token = common::candidate_token(&state, candidate_id, "jane@test.com");

    let app = test_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(serde_json::to_string(&json!({ "job_id": 999999 })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_applications_scoped_to_candidate() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let token = common::candidate_token(&state, candidate_id, "jane@test.com");

    let app = test_router(state);

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(serde_json::to_string(&json!({ "job_id": job_id })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/applications")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["data"][0]["job_id"], job_id);
}

#[tokio::test]
async fn update_application_status_rejects_unknown_status() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let candidate_token = common::candidate_token(&state, candidate_id, "jane@test.com");
    let company_token = common::company_token(&state, 9001, "hr@acme.test", company_id);

    let app = test_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {candidate_token}"))
                .body(Body::from(serde_json::to_string(&json!({ "job_id": job_id })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let application_id = created["application"]["application_id"].as_i64().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/applications/{application_id}/status"))
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {company_token}"))
                .body(Body::from(serde_json::to_string(&json!({ "status": "not_a_real_status" })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(payload["status"], "invalid_status");
}

#[tokio::test]
async fn pipeline_counts_are_zero_filled() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;
    let candidate_id = common::create_test_candidate(&state.db, "Jane Doe", "jane@test.com").await;
    let candidate_token = common::candidate_token(&state, candidate_id, "jane@test.com");
    let company_token = common::company_token(&state, 9001, "hr@acme.test", company_id);

    let app = test_router(state);

    let _ = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/applications")
                .header("content-type", "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {candidate_token}"))
                .body(Body::from(serde_json::to_string(&json!({ "job_id": job_id })).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/applications/pipeline-counts?job_id={job_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {company_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let counts: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();

    assert_eq!(counts.len(), 6);
    let applied = counts.iter().find(|c| c["status"] == "APPLIED").unwrap();
    assert_eq!(applied["count"], 1);
    let hired = counts.iter().find(|c| c["status"] == "HIRED").unwrap();
    assert_eq!(hired["count"], 0);
}
