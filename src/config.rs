use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub app_env: String,
    pub app_port: u16,
    pub api_base_url: String,
    pub host: String,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret: String,
    pub jwt_access_expiry: i64,

    /// Accepted for operational parity with deployments that tune it, but
    /// only logged — argon2's own default parameters are already sound.
    pub password_salt_rounds: u32,

    pub location_tree_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            app_port: env::var("APP_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("APP_PORT".to_string()))?,
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string()))?,

            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            jwt_access_expiry: env::var("JWT_ACCESS_EXPIRY")
                .unwrap_or_else(|_| "900".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_EXPIRY".to_string()))?,

            password_salt_rounds: env::var("PASSWORD_SALT_ROUNDS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PASSWORD_SALT_ROUNDS".to_string()))?,

            location_tree_path: env::var("LOCATION_TREE_PATH")
                .unwrap_or_else(|_| "data/locations.json".to_string()),
        };

        if config.password_salt_rounds != 12 {
            tracing::info!(
                rounds = config.password_salt_rounds,
                "PASSWORD_SALT_ROUNDS set but ignored; argon2 uses its own tuned parameters"
            );
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.app_env == "development"
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(String),

    #[error("invalid value for environment variable: {0}")]
    InvalidValue(String),
}
