use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use jobboard_backend::{
    config::Config,
    handlers::{applications, auth, candidates, companies, favorites, featured, health, jobs, locations},
    middleware::require_auth,
    AppState,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .json()
        .init();

    let config = Config::from_env()?;
    let port = config.app_port;

    tracing::info!("Starting jobboard backend in {} mode", config.app_env);

    let app_state = AppState::new(config).await?;

    // Auth (public)
    let auth_routes = Router::new()
        .route("/api/auth/register/candidate", post(auth::register_candidate))
        .route("/api/auth/register/company", post(auth::register_company))
        .route("/api/auth/login", post(auth::login));

    let auth_protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Jobs (public reads, protected mutations)
    let job_public_routes = Router::new()
        .route("/api/jobs", get(jobs::list_jobs))
        .route("/api/jobs/filters/options", get(jobs::filter_options))
        .route("/api/jobs/recommendations/titles", get(jobs::recommend_titles))
        .route("/api/jobs/{id}", get(jobs::get_job));

    let job_protected_routes = Router::new()
        .route("/api/jobs", post(jobs::create_job))
        .route("/api/jobs/{id}", put(jobs::update_job).delete(jobs::delete_job))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Companies (public reads, protected mutations)
    let company_public_routes = Router::new()
        .route("/api/companies", get(companies::list_companies))
        .route("/api/companies/{id}", get(companies::get_company))
        .route("/api/companies/{id}/jobs", get(companies::get_company_jobs));

    let company_protected_routes = Router::new()
        .route("/api/companies", post(companies::create_company))
        .route("/api/companies/{id}", put(companies::update_company).delete(companies::delete_company))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Applications (protected)
    let application_routes = Router::new()
        .route("/api/applications", get(applications::list_applications).post(applications::create_application))
        .route("/api/applications/pipeline-counts", get(applications::pipeline_counts))
        .route("/api/applications/{id}/status", patch(applications::update_application_status))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Favorites (protected)
    let favorite_routes = Router::new()
        .route("/api/favorites", get(favorites::list_favorites))
        .route("/api/favorites/status", get(favorites::favorite_statuses))
        .route("/api/favorites/{job_id}", post(favorites::add_favorite).delete(favorites::remove_favorite))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Candidates (protected)
    let candidate_routes = Router::new()
        .route("/api/candidates/{id}", get(candidates::get_candidate).put(candidates::update_candidate))
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Featured companies (public reads, protected admin mutations)
    let featured_public_routes = Router::new().route("/api/featured-companies", get(featured::list_featured));

    let featured_protected_routes = Router::new()
        .route(
            "/api/featured-companies/{id}",
            post(featured::feature_company).delete(featured::unfeature_company),
        )
        .route_layer(middleware::from_fn_with_state(app_state.clone(), require_auth));

    // Locations (public)
    let location_routes = Router::new()
        .route("/api/locations/countries", get(locations::list_countries))
        .route("/api/locations/{country}/states", get(locations::list_states))
        .route("/api/locations/{country}/{state}/cities", get(locations::list_cities))
        .route("/api/locations/search", get(locations::search_locations));

    let app = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/health/ready", get(health::readiness))
        .merge(auth_routes)
        .merge(auth_protected_routes)
        .merge(job_public_routes)
        .merge(job_protected_routes)
        .merge(company_public_routes)
        .merge(company_protected_routes)
        .merge(application_routes)
        .merge(favorite_routes)
        .merge(candidate_routes)
        .merge(featured_public_routes)
        .merge(featured_protected_routes)
        .merge(location_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
