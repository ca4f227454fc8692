pub mod auth;
pub mod flow;
pub mod oauth;

// Re-export from auth.rs so we can do "use crate::auth::Authenticator;"
pub use auth::{AuthError, Authenticator, GrantedLogin};
