//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::models::{Claims, Role};
use crate::common::ApiError;

/// Verified identity of the requester, read from the claims the auth
/// middleware attached. Carries the mint-time snapshot, not the live record.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("missing auth".to_string()))?;

        Ok(AuthedUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}
