// src/common/config.rs
//! Startup configuration, read once from the environment.
//!
//! Every knob the service needs lives in this struct; nothing re-reads the
//! environment after `main` has constructed it.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub reset_db: bool,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub cors_origins: String,
    pub oauth: OAuthConfig,
    pub storage: StorageConfig,
}

/// Identity-provider credentials and the callback target registered with it.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_url: String,
}

/// Object-store location and credentials.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub bucket: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://filedrop.db".to_string());
        let reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

        let jwt_secret =
            env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
        let token_ttl_days = env::var("TOKEN_TTL_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(7);

        let cors_origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| {
            "http://localhost:3000,http://localhost:5173".to_string()
        });

        let oauth = OAuthConfig {
            client_id: env::var("OAUTH_CLIENT_ID").ok(),
            client_secret: env::var("OAUTH_CLIENT_SECRET").ok(),
            redirect_url: env::var("OAUTH_REDIRECT_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api/v1/auth/callback".to_string()),
        };

        let storage = StorageConfig {
            region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            bucket: env::var("AWS_S3_BUCKET_NAME").unwrap_or_default(),
            access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
        };

        Self {
            port,
            database_url,
            reset_db,
            jwt_secret,
            token_ttl_days,
            cors_origins,
            oauth,
            storage,
        }
    }
}
