//! Explicit login state machine.
//!
//! The OAuth dance is easy to get wrong when its progress lives implicitly in
//! scattered session keys. [`advance`] keeps every legal transition in one
//! place: it takes the current stage and an event and returns the next stage
//! plus the side effects the caller must perform, in order. The function does
//! no I/O, so the whole table is unit-testable.

/// Where a session stands in the login dance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    /// No login in progress, nothing in the session.
    Anonymous,
    /// The browser was sent to the provider; `csrf` must come back untouched.
    AwaitingCallback { csrf: String },
    /// Token and identity are attached to the session.
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    LoginRequested {
        csrf: String,
    },
    /// The provider redirected back, with whatever query parameters it sent.
    CallbackReceived {
        csrf: Option<String>,
        code: Option<String>,
    },
    /// Code exchange and identity lookup both succeeded.
    LoginCompleted,
    LoginFailed,
    LogoutRequested,
}

/// Side effects the route handler must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    RedirectToProvider,
    ExchangeCode { code: String },
    AttachLogin,
    ClearLogin,
    RedirectHome,
    RedirectLanding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: Stage,
    pub actions: Vec<Action>,
}

pub fn advance(stage: Stage, event: Event) -> Transition {
    match (stage, event) {
        // Starting a login restarts the dance, whatever came before.
        (_, Event::LoginRequested { csrf }) => Transition {
            next: Stage::AwaitingCallback { csrf },
            actions: vec![Action::RedirectToProvider],
        },

        // The provider called back with a code, and the state parameter
        // matches what this session handed out.
        (
            Stage::AwaitingCallback { csrf },
            Event::CallbackReceived {
                csrf: Some(returned),
                code: Some(code),
            },
        ) if returned == csrf => Transition {
            next: Stage::AwaitingCallback { csrf },
            actions: vec![Action::ExchangeCode { code }],
        },

        // Callback without a pending login, without a code, or with a state
        // mismatch.
        (_, Event::CallbackReceived { .. }) => failed_login(),

        (Stage::AwaitingCallback { .. }, Event::LoginCompleted) => Transition {
            next: Stage::Authenticated,
            actions: vec![Action::AttachLogin, Action::RedirectHome],
        },
        // Completion without a pending login has nothing to attach.
        (_, Event::LoginCompleted) => failed_login(),

        (_, Event::LoginFailed) => failed_login(),

        (_, Event::LogoutRequested) => Transition {
            next: Stage::Anonymous,
            actions: vec![Action::ClearLogin, Action::RedirectLanding],
        },
    }
}

/// Any failed or out-of-order step lands back on the landing page with the
/// session wiped, so a token never outlives its identity.
fn failed_login() -> Transition {
    Transition {
        next: Stage::Anonymous,
        actions: vec![Action::ClearLogin, Action::RedirectLanding],
    }
}
