//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored in place of an email when the provider returns none; email is the
/// upsert key so the column cannot be null.
pub const MISSING_EMAIL_PLACEHOLDER: &str = "--no-email--";

/// Authorization level. Exact allow-list matching only; ADMIN does not
/// implicitly cover USER-tagged operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub picture: Option<String>,
    pub role: Role,
    pub provider: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Profile resolved from the identity provider, used for directory upserts.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub picture: String,
    pub provider: String,
}

/// JWT claims structure
///
/// A snapshot of the user record at mint time; later record changes (role
/// promotion included) do not propagate into live tokens.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub iat: usize,
    pub exp: usize,
}

/// Query string of the OAuth callback redirect.
#[derive(Deserialize, Debug)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginUrlResponse {
    pub url: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromotionResponse {
    pub message: String,
    pub requires_reauth: bool,
}
