//! Token codec: mints and verifies the signed claims snapshot.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{error, warn};

use super::models::{Claims, User};
use crate::common::ApiError;

/// Sign a claims snapshot of the user record with HS256. `iat`/`exp` derive
/// from the current time and the configured ttl.
pub fn mint(user: &User, secret: &str, ttl: Duration) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        role: user.role,
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        picture: user.picture.clone(),
        provider: user.provider.clone(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user.id, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Verify signature and expiry. No leeway: an expired token is dead, and
/// there is no revocation list on top.
pub fn verify(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid token".to_string())
    })
}
