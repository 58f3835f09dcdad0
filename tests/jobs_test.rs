mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use jobboard_backend::handlers::jobs;
use tower::ServiceExt;

fn test_router(state: jobboard_backend::AppState) -> Router {
    Router::new()
        .route("/jobs", get(jobs::list_jobs))
        .route("/jobs/{id}", get(jobs::get_job))
        .with_state(state)
}

#[tokio::test]
async fn list_jobs_empty() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri("/jobs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["total"], 0);
    assert_eq!(page["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn list_jobs_returns_seeded_rows() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    common::create_test_job(&state.db, company_id, "Backend Developer").await;
    common::create_test_job(&state.db, company_id, "Frontend Developer").await;

    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri("/jobs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["total"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn list_jobs_filters_by_country() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    common::create_test_job(&state.db, company_id, "US Job").await;

    let mexico_job_id = jobboard_backend::services::counter::Counter::next(&state.db, "job_id").await.unwrap();
    sqlx::query(
        "INSERT INTO jobs (job_id, title, description, company_id, country, listed_time) \
         VALUES ($1, 'MX Job', 'A test job description', $2, 'Mexico', now())",
    )
    .bind(mexico_job_id)
    .bind(company_id)
    .execute(&state.db)
    .await
    .unwrap();

    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri("/jobs?country=United+States").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(page["meta"]["total"], 1);
}

#[tokio::test]
async fn list_jobs_with_search_term_uses_ranked_mode() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    common::create_test_job(&state.db, company_id, "Rust Developer").await;
    common::create_test_job(&state.db, company_id, "Python Developer").await;

    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri("/jobs?q=Rust").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["total"], 1);
    assert_eq!(page["data"][0]["title"], "Rust Developer");
}

#[tokio::test]
async fn get_job_success() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    let job_id = common::create_test_job(&state.db, company_id, "Test Job").await;

    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri(format!("/jobs/{job_id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let job: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(job["title"], "Test Job");
    assert_eq!(job["company"]["name"], "Acme Corp");
}

#[tokio::test]
async fn get_job_not_found() {
    let state = common::setup_test_state().await;
    let app = test_router(state);

    let response = app
        .oneshot(Request::builder().uri("/jobs/999999").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_jobs_paginates() {
    let state = common::setup_test_state().await;
    let company_id = common::create_test_company(&state.db, "Acme Corp").await;
    for i in 1..=25 {
        common::create_test_job(&state.db, company_id, &format!("Job {i}")).await;
    }

    let app = test_router(state);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/jobs?page=1&limit=10").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["total"], 25);
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
    assert_eq!(page["meta"]["page"], 1);
    assert_eq!(page["meta"]["total_pages"], 3);

    let response = app
        .oneshot(Request::builder().uri("/jobs?page=2&limit=10").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let page: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(page["meta"]["page"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 10);
}
