//! Request authorization middleware: bearer-token verification and
//! declarative per-route role checks, composed ahead of the handlers.

use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::models::{Claims, Role};
use super::token;
use crate::common::{ApiError, AppState};

/// Verifies the bearer token and attaches the decoded claims to the request
/// for downstream extractors. Runs before any protected handler.
pub async fn require_auth(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let state_lock = req
        .extensions()
        .get::<Arc<RwLock<AppState>>>()
        .cloned()
        .ok_or_else(|| ApiError::InternalServer("missing app state".to_string()))?;
    let state = state_lock.read().await.clone();

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let header = match header {
        Some(h) => h,
        None => {
            warn!("Authentication failed: missing Authorization header");
            return Err(ApiError::Unauthorized("missing auth".into()));
        }
    };

    // Handle "Bearer <token>" format or raw token
    let bare_token = header.strip_prefix("Bearer ").unwrap_or(&header).to_string();

    let claims = token::verify(&bare_token, &state.jwt_secret)?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Role gate for routes that declare a required role set. One generic check
/// consumes the per-route allow-list; claims outside it get 403.
pub async fn require_role(
    allowed: &'static [Role],
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ApiError::Unauthorized("missing auth".into()))?;

    if !role_allowed(allowed, claims.role) {
        warn!(
            user_id = %claims.sub,
            role = %claims.role.as_str(),
            "Role check failed"
        );
        return Err(ApiError::Forbidden("insufficient role".into()));
    }

    Ok(next.run(req).await)
}

/// Exact allow-list membership, no hierarchy.
pub fn role_allowed(allowed: &[Role], role: Role) -> bool {
    allowed.contains(&role)
}
