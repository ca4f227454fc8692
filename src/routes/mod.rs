//! HTTP route definitions and handlers.

mod auth;
mod pages;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
///
/// Combines the page and authentication route modules into a single router
/// and attaches the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(pages::routes())
        .merge(auth::routes())
        .with_state(state)
}
