//! Authentication handlers: sign-in URL issuance, OAuth callback handling,
//! profile lookup, and role promotion.

use axum::extract::{Extension, Query};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::directory;
use super::extractors::AuthedUser;
use super::models::{
    CallbackQuery, LoginUrlResponse, NewUser, PromotionResponse, TokenResponse, User,
    MISSING_EMAIL_PLACEHOLDER,
};
use super::token;
use crate::common::{safe_email_log, ApiError, AppState};
use crate::services::ExternalIdentity;

/// GET /api/v1/auth/login
/// Redirects straight to the provider consent screen.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let url = sign_in_url(&state).await?;

    info!("Redirecting to provider sign-in");
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]))
}

/// GET /api/v1/auth/login-url
/// Same URL, returned as JSON for clients that drive the redirect themselves.
pub async fn login_url(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<LoginUrlResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let url = sign_in_url(&state).await?;
    Ok(Json(LoginUrlResponse { url }))
}

async fn sign_in_url(state: &AppState) -> Result<String, ApiError> {
    state
        .provider
        .sign_in_url(&state.oauth_redirect_url)
        .await
        .map_err(|e| {
            // Upstream detail stays in the logs; the client sees a generic failure
            error!(error = %e, "Failed to build provider sign-in URL");
            ApiError::InternalServer("sign-in is unavailable".to_string())
        })
}

/// GET /api/v1/auth/callback?code=
/// Exchanges the authorization code, upserts the user record, and mints a
/// token. Every failure mode presents as 401 so callers cannot tell which
/// step rejected them.
pub async fn callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<CallbackQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let code = params.code.ok_or_else(|| {
        warn!("OAuth callback without authorization code");
        ApiError::Unauthorized("authentication failed".to_string())
    })?;

    let identity = state.provider.exchange_code(&code).await.map_err(|e| {
        warn!(error = %e, "Authorization code exchange failed");
        ApiError::Unauthorized("authentication failed".to_string())
    })?;

    let profile = resolve_profile(identity);
    let user = directory::find_or_create(&state.db, &profile).await?;

    let jwt = token::mint(&user, &state.jwt_secret, state.token_ttl)?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful"
    );

    Ok(Json(TokenResponse { token: jwt }))
}

/// Project the provider identity onto a directory profile, substituting the
/// email placeholder and empty name/avatar strings for missing fields.
pub(crate) fn resolve_profile(identity: ExternalIdentity) -> NewUser {
    let (first_name, last_name) = split_full_name(identity.full_name.as_deref());

    NewUser {
        email: identity
            .email
            .unwrap_or_else(|| MISSING_EMAIL_PLACEHOLDER.to_string()),
        first_name,
        last_name,
        picture: identity.avatar_url.unwrap_or_default(),
        provider: "google".to_string(),
    }
}

/// First whitespace-delimited token is the first name; the remainder joins
/// back into the last name.
pub(crate) fn split_full_name(full_name: Option<&str>) -> (String, String) {
    let mut parts = full_name.unwrap_or_default().split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

/// GET /api/v1/auth/profile
/// Returns the current authenticated user's record.
#[axum::debug_handler]
pub async fn profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = directory::find_by_id(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    Ok(Json(user))
}

/// POST /api/v1/auth/promote-to-admin
/// Promotes the caller. Their current token still carries the old role
/// snapshot; re-authentication is required for the new one to take effect.
pub async fn promote_to_admin(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<PromotionResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = directory::promote_to_admin(&state.db, &authed.id).await?;

    info!(user_id = %user.id, "User promoted to ADMIN");

    Ok(Json(PromotionResponse {
        message: "Role updated to ADMIN. Sign in again to refresh your token.".to_string(),
        requires_reauth: true,
    }))
}
