//! Shared application state.

use crate::auth::Authenticator;
use crate::config::Config;
use crate::gitter::GitterClient;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned per handler; everything mutable lives in the session layer, not
/// here.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<Config>,
    /// Runs the OAuth2 exchange and identity resolution.
    pub auth: Arc<Authenticator>,
    /// Client for the provider's REST API.
    pub gitter: GitterClient,
}
