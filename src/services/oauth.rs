// src/services/oauth.rs
//! Identity-provider client: consent-screen URL generation and one-time
//! authorization-code exchange.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::common::config::OAuthConfig;

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("OAuth provider not configured")]
    NotConfigured,

    #[error("code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("unexpected provider response: {0}")]
    SerializationError(String),
}

/// Verified identity assertion returned by the provider after a successful
/// code exchange. Every field is best-effort; the auth flow substitutes
/// placeholders for whatever the provider omits.
#[derive(Debug, Clone, Default)]
pub struct ExternalIdentity {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Seam to the third-party identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the consent-screen URL the client should be redirected to.
    async fn sign_in_url(&self, redirect_uri: &str) -> Result<String, OAuthError>;

    /// Exchange a one-time authorization code for a verified identity.
    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, OAuthError>;
}

#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: OAuthConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleOAuth {
    pub fn new(config: OAuthConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    fn credentials(&self) -> Result<(&str, &str), OAuthError> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) => Ok((id, secret)),
            _ => Err(OAuthError::NotConfigured),
        }
    }
}

#[async_trait]
impl IdentityProvider for GoogleOAuth {
    async fn sign_in_url(&self, redirect_uri: &str) -> Result<String, OAuthError> {
        let (client_id, _) = self.credentials()?;

        let scopes = ["openid", "email", "profile"].join(" ");

        let auth_url = format!(
            "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}&response_type=code&scope={}",
            urlencoding::encode(client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes)
        );

        debug!("Generated Google OAuth authorization URL");
        Ok(auth_url)
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalIdentity, OAuthError> {
        let (client_id, client_secret) = self.credentials()?;

        let params = [
            ("code", code),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("redirect_uri", self.config.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code for tokens");

        let response = self
            .client
            .post("https://oauth2.googleapis.com/token")
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Token exchange failed");
            return Err(OAuthError::ExchangeFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let tokens = response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        let userinfo = self
            .client
            .get("https://www.googleapis.com/oauth2/v2/userinfo")
            .bearer_auth(&tokens.access_token)
            .send()
            .await
            .map_err(|e| OAuthError::RequestFailed(e.to_string()))?;

        if !userinfo.status().is_success() {
            return Err(OAuthError::ExchangeFailed(
                "no verified user identity returned".to_string(),
            ));
        }

        let info = userinfo
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| OAuthError::SerializationError(e.to_string()))?;

        info!("Authorization code exchanged successfully");
        Ok(ExternalIdentity {
            email: info.email,
            full_name: info.name,
            avatar_url: info.picture,
        })
    }
}
