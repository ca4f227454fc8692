//! Application startup and server initialization.
//!
//! Builds the OAuth client, API client, and session layer from the loaded
//! configuration, then binds and serves the router.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

use crate::auth::oauth::{OAuthClient, OAuthSettings};
use crate::auth::Authenticator;
use crate::config::{Config, ConfigError};
use crate::gitter::GitterClient;
use crate::routes;
use crate::state::AppState;

/// Builds the full application router, including the session layer.
///
/// Shared with the integration tests, which drive the router directly
/// instead of binding a listener.
pub fn build_router(config: Arc<Config>) -> Result<Router, ConfigError> {
    let gitter = GitterClient::new(config.host.clone());
    let oauth = OAuthClient::new(OAuthSettings::from_config(&config)?);
    let auth = Arc::new(Authenticator::new(oauth, gitter.clone()));

    let state = AppState {
        config,
        auth,
        gitter,
    };

    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::hours(2)));

    Ok(routes::create_router(state).layer(session_layer))
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the configured host is unusable, if the listener
/// cannot bind, or on a runtime serve error.
pub async fn run(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let port = config.port;
    let app = build_router(config)?;

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Demo app running at http://localhost:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}
