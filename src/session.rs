//! Session boundary: what gets stored, how the identity is serialized, and
//! how session contents map onto a login [`Stage`].
//!
//! Storage itself is delegated to `tower-sessions`; this module only decides
//! the keys and the serialized form. The identity is kept as its exact JSON
//! text so provider-supplied fields round-trip untouched.

use thiserror::Error;
use tower_sessions::Session;
use tracing::warn;

use crate::auth::flow::Stage;
use crate::models::User;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const STATE_KEY: &str = "oauth_state";

#[derive(Debug, Error)]
pub enum SessionError {
    /// The stored identity is not valid JSON of the expected shape. Callers
    /// must discard the session and force re-authentication.
    #[error("malformed session payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

/// Exact JSON text representation of an identity.
pub fn serialize_user(user: &User) -> Result<String, SessionError> {
    Ok(serde_json::to_string(user)?)
}

pub fn deserialize_user(raw: &str) -> Result<User, SessionError> {
    Ok(serde_json::from_str(raw)?)
}

/// Marks a login attempt as in flight: wipes any previous login and records
/// the CSRF state the provider must echo back.
pub async fn begin_login(session: &Session, csrf: &str) -> Result<(), SessionError> {
    session.remove::<String>(TOKEN_KEY).await?;
    session.remove::<String>(USER_KEY).await?;
    session.insert(STATE_KEY, csrf).await?;
    Ok(())
}

/// Attaches a confirmed login to the session.
///
/// Called only once both the token and the identity are in hand, so the
/// session never holds a token without its identity.
pub async fn attach_login(session: &Session, token: &str, user: &User) -> Result<(), SessionError> {
    let serialized = serialize_user(user)?;
    session.remove::<String>(STATE_KEY).await?;
    session.insert(TOKEN_KEY, token).await?;
    session.insert(USER_KEY, serialized).await?;
    Ok(())
}

pub async fn access_token(session: &Session) -> Option<String> {
    session.get::<String>(TOKEN_KEY).await.ok().flatten()
}

pub async fn pending_state(session: &Session) -> Option<String> {
    session.get::<String>(STATE_KEY).await.ok().flatten()
}

/// The identity attached to this session, if any.
pub async fn current_user(session: &Session) -> Result<Option<User>, SessionError> {
    let raw = match session.get::<String>(USER_KEY).await? {
        Some(raw) => raw,
        None => return Ok(None),
    };
    Ok(Some(deserialize_user(&raw)?))
}

/// Destroys the session entirely.
pub async fn clear(session: &Session) {
    if let Err(e) = session.flush().await {
        warn!("failed to destroy session: {}", e);
    }
}

/// Derives the login stage from what the session holds. An unreadable
/// session counts as anonymous, which forces a fresh login.
pub async fn stage_of(session: &Session) -> Stage {
    match current_user(session).await {
        Ok(Some(_)) => {
            if access_token(session).await.is_some() {
                return Stage::Authenticated;
            }
        }
        Ok(None) => {}
        Err(e) => warn!("discarding unreadable session state: {}", e),
    }

    match pending_state(session).await {
        Some(csrf) => Stage::AwaitingCallback { csrf },
        None => Stage::Anonymous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Serialize then deserialize yields an equal identity.
    #[test]
    fn test_identity_round_trip() {
        let user: User = serde_json::from_value(json!({
            "id": "42",
            "name": "Ada",
            "avatarUrlMedium": "https://avatars.example.com/ada",
        }))
        .unwrap();

        let raw = serialize_user(&user).unwrap();
        let restored = deserialize_user(&raw).unwrap();
        assert_eq!(restored, user);
    }

    /// Garbage in the session is a malformed-session error, not a panic.
    #[test]
    fn test_malformed_payload_is_rejected() {
        assert!(matches!(
            deserialize_user("not json at all"),
            Err(SessionError::Malformed(_))
        ));
    }

    /// Valid JSON of the wrong shape is rejected too.
    #[test]
    fn test_wrong_shape_is_rejected() {
        assert!(matches!(
            deserialize_user(r#"{"name":"no id here"}"#),
            Err(SessionError::Malformed(_))
        ));
        assert!(matches!(
            deserialize_user("[1,2,3]"),
            Err(SessionError::Malformed(_))
        ));
    }
}
