//! Application route catalogue and each route's access requirement.

pub const HOME: &str = "/";
pub const DASHBOARD: &str = "/dashboard";
pub const REPORT: &str = "/report";
pub const PROFILE: &str = "/profile";
pub const ADMIN: &str = "/admin";
pub const ANALYTICS: &str = "/analytics";
pub const APPEALS: &str = "/appeals";
pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const ABOUT: &str = "/about";
pub const CONTACT: &str = "/contact";
pub const PRIVACY: &str = "/privacy";
pub const TERMS: &str = "/terms";

/// What a route demands of the session before it renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Signed-in users only (`requiresAuth: true`).
    RequiresAuth,
    /// Entry points such as sign-in that signed-in users skip (`requiresAuth: false`).
    GuestOnly,
}

const PROTECTED: &[&str] = &[DASHBOARD, REPORT, PROFILE, ADMIN, ANALYTICS, APPEALS];
const GUEST_ONLY: &[&str] = &[LOGIN, REGISTER];

/// Strip query, fragment and trailing slash: `/admin/users/?x=1` -> `/admin/users`.
#[must_use]
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { HOME } else { trimmed }
}

/// Segment-prefix match, ASCII case-insensitive like the browser router.
fn matches_route(path: &str, route: &str) -> bool {
    let Some(head) = path.get(..route.len()) else {
        return false;
    };
    head.eq_ignore_ascii_case(route) && (path.len() == route.len() || path[route.len()..].starts_with('/'))
}

/// Requirement for `path`, or `None` for public pages (including unknown ones).
#[must_use]
pub fn requirement(path: &str) -> Option<RouteRequirement> {
    let path = normalize(path);
    if PROTECTED.iter().any(|route| matches_route(path, route)) {
        Some(RouteRequirement::RequiresAuth)
    } else if GUEST_ONLY.iter().any(|route| matches_route(path, route)) {
        Some(RouteRequirement::GuestOnly)
    } else {
        None
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
