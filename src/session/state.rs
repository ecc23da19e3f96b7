//! Session snapshot, actions, and the reducer that applies them.
//!
//! DESIGN
//! ======
//! `reduce` is the only writer. It is pure and total, so the session seen by
//! readers is always the fold of every dispatched action in dispatch order.
//! `is_authenticated` is computed from the token rather than stored, which
//! makes "authenticated iff token present" hold for every reachable state.

use crate::api::{AuthError, User};

/// Coarse state of the session, derived from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Startup check has not settled yet.
    Initializing,
    /// An operation is running; the previous terminal state still applies.
    OperationInFlight,
    /// The last operation failed. User/token are whatever preceded it.
    Failed,
    Authenticated,
    Unauthenticated,
}

impl SessionPhase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::OperationInFlight => "in_flight",
            Self::Failed => "failed",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}

/// The authentication state of the running application.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<User>,
    token: Option<String>,
    is_loading: bool,
    error: Option<AuthError>,
    settled: bool,
}

impl Default for Session {
    /// Startup shape: loading, nothing else known.
    fn default() -> Self {
        Self { user: None, token: None, is_loading: true, error: None, settled: false }
    }
}

impl Session {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            if self.settled { SessionPhase::OperationInFlight } else { SessionPhase::Initializing }
        } else if self.error.is_some() {
            SessionPhase::Failed
        } else if self.is_authenticated() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }
}

/// Every way the session can change.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    SetLoading(bool),
    LoginSuccess { user: User, token: String },
    Logout,
    SetError(AuthError),
    ClearError,
}

impl SessionAction {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetLoading(_) => "SET_LOADING",
            Self::LoginSuccess { .. } => "LOGIN_SUCCESS",
            Self::Logout => "LOGOUT",
            Self::SetError(_) => "SET_ERROR",
            Self::ClearError => "CLEAR_ERROR",
        }
    }
}

/// Apply one action to a session.
#[must_use]
pub fn reduce(state: Session, action: SessionAction) -> Session {
    match action {
        SessionAction::SetLoading(flag) => Session {
            is_loading: flag,
            error: None,
            settled: state.settled || !flag,
            ..state
        },
        SessionAction::LoginSuccess { user, token } => {
            let token = Some(token).filter(|t| !t.is_empty());
            // A login without a usable token cannot back a session.
            let user = if token.is_some() { Some(user) } else { None };
            Session { user, token, is_loading: false, error: None, settled: true }
        }
        SessionAction::Logout => Session { user: None, token: None, is_loading: false, error: None, settled: true },
        SessionAction::SetError(error) => Session {
            error: Some(error),
            is_loading: false,
            settled: true,
            ..state
        },
        SessionAction::ClearError => Session { error: None, ..state },
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
