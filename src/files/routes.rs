//! File routes

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::auth::guard;
use crate::auth::models::Role;

/// Roles allowed to list every user's files.
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Request bodies above this are refused outright; the 10 MiB upload cap is
/// enforced with a 400 inside the handler.
const MAX_BODY_SIZE: usize = 12 * 1024 * 1024;

/// Creates and returns the file router. Every route requires a bearer token;
/// `/files/all` additionally requires the ADMIN role.
///
/// # Routes
/// - `POST /files/upload` - multipart upload (field `file`)
/// - `GET /files/me` - caller's files, newest first
/// - `GET /files/all` - all files with owners (ADMIN)
pub fn files_routes() -> Router {
    let admin = Router::new()
        .route("/files/all", get(handlers::all_files))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            guard::require_role(ADMIN_ONLY, req, next)
        }));

    Router::new()
        .route("/files/upload", post(handlers::upload))
        .route("/files/me", get(handlers::my_files))
        .merge(admin)
        .route_layer(middleware::from_fn(guard::require_auth))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
}
