//! Bridges the authorization-code exchange to the application's identity
//! model.

use thiserror::Error;
use tracing::info;

use super::oauth::{OAuthClient, OAuthError};
use crate::gitter::{ApiError, GitterClient};
use crate::models::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token exchange failed: {0}")]
    Exchange(#[from] OAuthError),
    #[error("identity lookup failed: {0}")]
    Identity(#[from] ApiError),
}

/// Everything a successful login yields. Token and identity travel together
/// so the session is only ever written with both confirmed.
#[derive(Debug, Clone)]
pub struct GrantedLogin {
    pub token: String,
    pub user: User,
}

pub struct Authenticator {
    oauth: OAuthClient,
    gitter: GitterClient,
}

impl Authenticator {
    pub fn new(oauth: OAuthClient, gitter: GitterClient) -> Self {
        Authenticator { oauth, gitter }
    }

    /// Where to send the browser to begin authorization.
    pub fn authorization_url(&self, state: &str) -> String {
        self.oauth.authorization_url(state)
    }

    /// Runs the server half of the grant: code -> token -> identity.
    ///
    /// Any failure, including a token whose user list comes back empty,
    /// aborts the login with nothing persisted.
    pub async fn complete_login(&self, code: &str) -> Result<GrantedLogin, AuthError> {
        let token = self.oauth.exchange_code(code).await?;
        let user = self.gitter.fetch_current_user(&token).await?;

        info!(user_id = %user.id, "login granted");
        Ok(GrantedLogin { token, user })
    }
}
