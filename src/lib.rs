pub mod config;
pub mod handlers;
pub mod models;
pub mod query;
pub mod services;

pub mod error;
pub mod middleware;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use config::Config;
use models::company::CompanyDto;
use models::pagination::Paginated;
use services::cache::TtlCache;
use services::location_index::LocationIndex;

const FILTER_OPTIONS_CACHE_TTL: Duration = Duration::from_secs(300);
const FEATURED_COMPANIES_CACHE_TTL: Duration = Duration::from_secs(60);

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,

    /// Warm, lazily-loaded flattened location search index.
    pub location_index: Arc<LocationIndex>,

    /// `{work_types, work_location_types, pay_periods}` distincts, keyed by
    /// a constant since there are no parameters to vary by.
    pub filter_options_cache: Arc<TtlCache<&'static str, serde_json::Value>>,

    /// Featured-company listing, keyed by the requested page size.
    pub featured_companies_cache: Arc<TtlCache<i64, Paginated<CompanyDto>>>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        tracing::info!("Connecting to PostgreSQL...");
        let db = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db).await?;

        let location_index = Arc::new(LocationIndex::new(config.location_tree_path.clone()));
        let filter_options_cache = Arc::new(TtlCache::new(FILTER_OPTIONS_CACHE_TTL));
        let featured_companies_cache = Arc::new(TtlCache::new(FEATURED_COMPANIES_CACHE_TTL));

        Ok(Self {
            db,
            config: Arc::new(config),
            location_index,
            filter_options_cache,
            featured_companies_cache,
        })
    }
}
