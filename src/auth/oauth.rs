//! Client side of the OAuth2 authorization-code grant.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::{Config, ConfigError};

/// Endpoints and credentials for the grant, derived from process
/// configuration once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub authorize_url: Url,
    pub token_url: Url,
    pub client_id: String,
    pub client_secret: String,
    /// Sent to the provider as `redirect_uri`; the provider resolves it
    /// against the registered application.
    pub callback_path: String,
}

impl OAuthSettings {
    /// Builds the provider endpoints from the configured host.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let host = config.host_url()?;
        let authorize_url = host
            .join("/login/oauth/authorize")
            .map_err(|_| ConfigError::InvalidHost)?;
        let token_url = host
            .join("/login/oauth/token")
            .map_err(|_| ConfigError::InvalidHost)?;

        Ok(OAuthSettings {
            authorize_url,
            token_url,
            client_id: config.gitter_key.clone().unwrap_or_default(),
            client_secret: config.gitter_secret.clone().unwrap_or_default(),
            callback_path: "/login/callback".to_string(),
        })
    }
}

/// Failures from the token endpoint.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("error sending token request: {0}")]
    Network(#[from] reqwest::Error),
    #[error("token endpoint answered {status}: {detail}")]
    Status { status: u16, detail: String },
}

/// Successful answer from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
}

pub struct OAuthClient {
    settings: OAuthSettings,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(settings: OAuthSettings) -> Self {
        OAuthClient {
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// The URL to send the browser to, carrying our CSRF `state`.
    pub fn authorization_url(&self, state: &str) -> String {
        let mut url = self.settings.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.settings.client_id)
            .append_pair("redirect_uri", &self.settings.callback_path)
            .append_pair("state", state);
        url.into()
    }

    /// Exchanges an authorization code for a bearer access token.
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.settings.callback_path.as_str()),
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.settings.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let detail = response.text().await.unwrap_or_default();
            return Err(OAuthError::Status { status, detail });
        }

        let token: TokenResponse = response.json().await?;
        debug!(token_type = %token.token_type, "exchanged authorization code");
        Ok(token.access_token)
    }
}
