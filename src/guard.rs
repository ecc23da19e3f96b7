//! Session guard: per-navigation access decisions.
//!
//! DESIGN
//! ======
//! `SessionGuard::evaluate` is a pure function of the session snapshot, the
//! route requirement and the requested location. `Navigator` plays the role
//! of browser history: it holds the current location, including the
//! remembered `from` destination a redirect to sign-in carries, and follows
//! redirects until something renders.

use crate::routes::{self, RouteRequirement};
use crate::session::Session;

const MAX_REDIRECTS: usize = 4;

/// A navigation target plus the destination to return to after sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub from: Option<String>,
}

impl Location {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), from: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; show a neutral indicator, decide nothing.
    Wait,
    /// Show the requested content.
    Render,
    /// Replace the current location.
    Redirect(Location),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGuard {
    sign_in_path: String,
    default_landing: String,
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new(routes::LOGIN, routes::DASHBOARD)
    }
}

impl SessionGuard {
    #[must_use]
    pub fn new(sign_in_path: impl Into<String>, default_landing: impl Into<String>) -> Self {
        Self { sign_in_path: sign_in_path.into(), default_landing: default_landing.into() }
    }

    #[must_use]
    pub fn evaluate(&self, session: &Session, requirement: Option<RouteRequirement>, location: &Location) -> GuardDecision {
        if session.is_loading() {
            return GuardDecision::Wait;
        }
        match requirement {
            Some(RouteRequirement::RequiresAuth) if !session.is_authenticated() => GuardDecision::Redirect(Location {
                path: self.sign_in_path.clone(),
                from: Some(location.path.clone()),
            }),
            Some(RouteRequirement::GuestOnly) if session.is_authenticated() => {
                let target = location.from.clone().unwrap_or_else(|| self.default_landing.clone());
                GuardDecision::Redirect(Location::new(target))
            }
            _ => GuardDecision::Render,
        }
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Outcome of resolving a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The guard is waiting on the session; the location is kept for `refresh`.
    Waiting(Location),
    Rendered(Location),
}

impl Resolution {
    #[must_use]
    pub fn location(&self) -> &Location {
        match self {
            Self::Waiting(location) | Self::Rendered(location) => location,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Navigator {
    guard: SessionGuard,
    current: Location,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(SessionGuard::default())
    }
}

impl Navigator {
    #[must_use]
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard, current: Location::new(routes::HOME) }
    }

    #[must_use]
    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Navigate to `path` and follow guard redirects.
    pub fn visit(&mut self, session: &Session, path: &str) -> Resolution {
        self.current = Location::new(path);
        self.resolve(session)
    }

    /// Re-run the guard for the current location after the session changed.
    pub fn refresh(&mut self, session: &Session) -> Resolution {
        self.resolve(session)
    }

    fn resolve(&mut self, session: &Session) -> Resolution {
        for _ in 0..=MAX_REDIRECTS {
            let requirement = routes::requirement(&self.current.path);
            match self.guard.evaluate(session, requirement, &self.current) {
                GuardDecision::Wait => return Resolution::Waiting(self.current.clone()),
                GuardDecision::Render => return Resolution::Rendered(self.current.clone()),
                GuardDecision::Redirect(next) => {
                    tracing::debug!(from = %self.current.path, to = %next.path, "guard redirect");
                    self.current = next;
                }
            }
        }
        tracing::warn!(path = %self.current.path, "redirect limit reached; rendering current location");
        Resolution::Rendered(self.current.clone())
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
