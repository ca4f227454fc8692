//! Landing and home pages.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use tower_sessions::Session;
use tracing::{error, warn};

use crate::models::{Room, User};
use crate::session;
use crate::state::AppState;
use crate::utils::http_helpers::HTTPError;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing))
        .route("/home", get(home))
}

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Login with Gitter</title></head>
<body>
    <h1>Login with Gitter demo</h1>
    <p><a href="/login">Sign in with Gitter</a></p>
</body>
</html>
"#;

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

/// Renders the signed-in view: identity, token, and the user's rooms.
///
/// Unauthenticated (or unreadable) sessions are sent back to the landing
/// page. A failing room fetch is a server error, never a partial render.
async fn home(State(state): State<AppState>, session: Session) -> Result<Response, HTTPError> {
    let user = match session::current_user(&session).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(Redirect::to("/").into_response()),
        Err(e) => {
            warn!("discarding unreadable session: {}", e);
            session::clear(&session).await;
            return Ok(Redirect::to("/").into_response());
        }
    };

    let token = match session::access_token(&session).await {
        Some(token) => token,
        None => return Ok(Redirect::to("/").into_response()),
    };

    let rooms = match state.gitter.fetch_rooms(&user.id, &token).await {
        Ok(rooms) => rooms,
        Err(e) => {
            error!(user_id = %user.id, "failed to fetch rooms: {}", e);
            return Err(HTTPError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to fetch rooms",
            ));
        }
    };

    let client_id = state.config.gitter_key.clone().unwrap_or_default();
    Ok(Html(render_home(&user, &token, &client_id, &rooms)).into_response())
}

fn render_home(user: &User, token: &str, client_id: &str, rooms: &[Room]) -> String {
    let mut items = String::new();
    for room in rooms {
        items.push_str("        <li>");
        items.push_str(&html_escape::encode_text(&room.name));
        items.push_str("</li>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Home</title></head>
<body>
    <h1>Hello {name}</h1>
    <p>Signed in against OAuth app <code>{client_id}</code> with token <code>{token}</code>.</p>
    <p><a href="/logout">Log out</a></p>
    <h2>Your rooms</h2>
    <ul>
{items}    </ul>
</body>
</html>
"#,
        name = html_escape::encode_text(user.display_name()),
        client_id = html_escape::encode_text(client_id),
        token = html_escape::encode_text(token),
        items = items,
    )
}
