// Application state shared across all modules

use chrono::Duration;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{BlobStore, IdentityProvider};

/// Application state containing the database pool, collaborator handles, and
/// the token-signing configuration. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub oauth_redirect_url: String,
    pub provider: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn BlobStore>,
}
