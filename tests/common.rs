use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use gitterlogin::config::Config;
use gitterlogin::startup;
use tower::ServiceExt;

pub fn test_config(host: &str) -> Config {
    Config {
        host: host.to_string(),
        port: 0,
        gitter_key: Some("test-client".to_string()),
        gitter_secret: Some("test-secret".to_string()),
        logging: Default::default(),
    }
}

pub fn build_app(config: Config) -> Router {
    startup::build_router(Arc::new(config)).expect("router should build")
}

/// Sends a GET request, optionally replaying a session cookie.
pub async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = builder
        .body(Body::empty())
        .expect("failed to build request");

    app.clone()
        .oneshot(request)
        .await
        .expect("request should not fail at the transport level")
}

/// The session cookie issued by a response, in replayable `name=value` form.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// A query parameter from an absolute URL.
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let url = url::Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
