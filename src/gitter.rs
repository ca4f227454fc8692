//! Client for the provider's REST API.
//!
//! Stateless: every call performs exactly one outbound request with the
//! caller's bearer token. No caching, no retries.

use http::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{Room, User};

/// Failures surfaced by the API client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("error sending request: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(StatusCode),
    #[error("error parsing response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("user endpoint returned an empty list")]
    EmptyUser,
}

/// Thin wrapper over the provider's API, parameterized per call.
#[derive(Clone)]
pub struct GitterClient {
    host: String,
    http: reqwest::Client,
}

impl GitterClient {
    pub fn new(host: String) -> Self {
        GitterClient {
            host,
            http: reqwest::Client::new(),
        }
    }

    /// Performs one authenticated GET against the API and decodes the body
    /// as JSON. Anything other than a 200 response is an error; the body is
    /// returned as-is with no schema validation.
    pub async fn fetch(&self, path: &str, token: &str) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.host, path);

        debug!("Sending API request to: {}", url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ApiError::Status(response.status()));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Resolves the identity behind `token`.
    ///
    /// The user endpoint answers with a list; the current user is its first
    /// element. An empty list means the token grants access to nobody, which
    /// callers must treat as an authentication failure.
    pub async fn fetch_current_user(&self, token: &str) -> Result<User, ApiError> {
        let value = self.fetch("/api/v1/user/", token).await?;
        let mut users: Vec<User> = serde_json::from_value(value)?;

        if users.is_empty() {
            return Err(ApiError::EmptyUser);
        }
        Ok(users.remove(0))
    }

    /// Lists the rooms visible to the identified user, unmodified.
    pub async fn fetch_rooms(&self, user_id: &str, token: &str) -> Result<Vec<Room>, ApiError> {
        let value = self
            .fetch(&format!("/api/v1/user/{}/rooms", user_id), token)
            .await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    /// Test that a 200 user response yields the first identity in the list.
    #[tokio::test]
    async fn test_fetch_current_user_returns_first_entry() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/v1/user/")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":"42","name":"Ada"},{"id":"43","name":"Grace"}]"#)
            .create_async()
            .await;

        let client = GitterClient::new(server.url());
        let user = client.fetch_current_user("abc123").await.unwrap();
        m.assert_async().await;

        assert_eq!(user.id, "42");
        assert_eq!(user.display_name(), "Ada");
    }

    /// Test that an empty user list is reported as EmptyUser.
    #[tokio::test]
    async fn test_fetch_current_user_empty_list() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = GitterClient::new(server.url());
        let result = client.fetch_current_user("abc123").await;
        m.assert_async().await;

        assert!(matches!(result, Err(ApiError::EmptyUser)));
    }

    /// Test that a non-200 response is surfaced as a status error, even for
    /// other success-class codes.
    #[tokio::test]
    async fn test_fetch_rejects_non_200_status() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/v1/user/")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let client = GitterClient::new(server.url());
        let result = client.fetch("/api/v1/user/", "expired").await;
        m.assert_async().await;

        match result {
            Err(ApiError::Status(code)) => assert_eq!(code, StatusCode::UNAUTHORIZED),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    /// Test that the room list decodes with its metadata intact.
    #[tokio::test]
    async fn test_fetch_rooms() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/v1/user/42/rooms")
            .match_header("authorization", "Bearer abc123")
            .with_status(200)
            .with_body(r#"[{"id":"r1","name":"demo/room","topic":"hello"}]"#)
            .create_async()
            .await;

        let client = GitterClient::new(server.url());
        let rooms = client.fetch_rooms("42", "abc123").await.unwrap();
        m.assert_async().await;

        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].name, "demo/room");
    }

    /// Test that a body that is not JSON is a decode error.
    #[tokio::test]
    async fn test_fetch_rejects_non_json_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/api/v1/user/")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = GitterClient::new(server.url());
        let result = client.fetch("/api/v1/user/", "abc123").await;
        m.assert_async().await;

        assert!(matches!(result, Err(ApiError::Decode(_))));
    }
}
