//! Authentication routes

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{guard, handlers};

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/login` - 302 redirect to the provider sign-in URL
/// - `GET /auth/login-url` - sign-in URL as JSON
/// - `GET /auth/callback` - OAuth code exchange, returns a token
/// - `GET /auth/profile` - current user record (bearer)
/// - `POST /auth/promote-to-admin` - role promotion (bearer)
pub fn auth_routes() -> Router {
    let public = Router::new()
        .route("/auth/login", get(handlers::login))
        .route("/auth/login-url", get(handlers::login_url))
        .route("/auth/callback", get(handlers::callback));

    let protected = Router::new()
        .route("/auth/profile", get(handlers::profile))
        .route("/auth/promote-to-admin", post(handlers::promote_to_admin))
        .route_layer(middleware::from_fn(guard::require_auth));

    public.merge(protected)
}
