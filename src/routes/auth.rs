//! Login, callback, and logout handlers.
//!
//! The handlers translate requests into flow events, let
//! [`flow::advance`] decide what happens, and carry out the resulting
//! actions against the session.

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;
use uuid::Uuid;

use crate::auth::flow::{self, Action, Event, Transition};
use crate::auth::GrantedLogin;
use crate::session;
use crate::state::AppState;

/// Registers the authentication routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login))
        .route("/login/callback", get(login_callback))
        .route("/logout", get(logout))
}

/// Begins authorization: records the pending login in the session and
/// bounces the browser to the provider.
async fn login(State(state): State<AppState>, session: Session) -> Redirect {
    let csrf = Uuid::new_v4().to_string();
    let stage = session::stage_of(&session).await;
    let transition = flow::advance(stage, Event::LoginRequested { csrf: csrf.clone() });

    if !transition.actions.contains(&Action::RedirectToProvider) {
        return Redirect::to("/");
    }

    if let Err(e) = session::begin_login(&session, &csrf).await {
        warn!("could not record pending login: {}", e);
        return Redirect::to("/");
    }

    Redirect::to(&state.auth.authorization_url(&csrf))
}

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Handles the provider redirect: verifies the pending login, exchanges the
/// code, resolves the identity, and only then attaches both to the session.
async fn login_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Redirect {
    if let Some(error) = &params.error {
        warn!(error = %error, "provider reported authorization failure");
    }

    // A provider-reported error voids whatever code came with it.
    let code = if params.error.is_some() {
        None
    } else {
        params.code
    };

    let stage = session::stage_of(&session).await;
    let transition = flow::advance(
        stage,
        Event::CallbackReceived {
            csrf: params.state,
            code,
        },
    );

    let code = match exchange_request(&transition) {
        Some(code) => code,
        None => return settle(&session, transition, None).await,
    };

    match state.auth.complete_login(&code).await {
        Ok(granted) => {
            let next = flow::advance(transition.next, Event::LoginCompleted);
            settle(&session, next, Some(granted)).await
        }
        Err(e) => {
            warn!("authorization failed: {}", e);
            let next = flow::advance(transition.next, Event::LoginFailed);
            settle(&session, next, None).await
        }
    }
}

/// Destroys the session and returns to the landing page.
async fn logout(session: Session) -> Redirect {
    let stage = session::stage_of(&session).await;
    let transition = flow::advance(stage, Event::LogoutRequested);
    settle(&session, transition, None).await
}

/// The authorization code the transition asks us to exchange, if any.
fn exchange_request(transition: &Transition) -> Option<String> {
    transition.actions.iter().find_map(|action| match action {
        Action::ExchangeCode { code } => Some(code.clone()),
        _ => None,
    })
}

/// Executes the session side effects of a transition and produces the
/// redirect it prescribes.
async fn settle(
    session: &Session,
    transition: Transition,
    granted: Option<GrantedLogin>,
) -> Redirect {
    let mut destination = "/";

    for action in &transition.actions {
        match action {
            Action::AttachLogin => {
                if let Some(granted) = &granted {
                    if let Err(e) =
                        session::attach_login(session, &granted.token, &granted.user).await
                    {
                        warn!("could not attach login to session: {}", e);
                        session::clear(session).await;
                        return Redirect::to("/");
                    }
                }
            }
            Action::ClearLogin => session::clear(session).await,
            Action::RedirectHome => destination = "/home",
            Action::RedirectLanding => destination = "/",
            // Handled by the calling handler.
            Action::RedirectToProvider | Action::ExchangeCode { .. } => {}
        }
    }

    Redirect::to(destination)
}
