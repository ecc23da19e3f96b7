//! Wire types shared by the session API trait and its HTTP implementation.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::AuthError;

// =============================================================================
// USER
// =============================================================================

/// User identifier as issued by the authority (numeric or opaque string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// User record returned by the authority and persisted in the token store.
///
/// Only `id` is required. Fields this crate does not know about are kept in
/// `extra` so the record survives a save/load round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Name shown in the UI: display name, then email, then the id.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.to_string())
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// Successful register/login outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSuccess {
    pub user: User,
    pub token: String,
}

/// Successful refresh outcome. `token` is set when the authority rotated it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    #[serde(default)]
    pub token: Option<String>,
}

/// Per-field failure reported by validation or by the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: &str, message: &str) -> Self {
        Self { field: field.to_owned(), message: message.to_owned() }
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

const EMAIL_REGEX: &str = r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$";

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(compile_email_pattern);

fn compile_email_pattern() -> Option<Regex> {
    match Regex::new(EMAIL_REGEX) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::error!(error = %e, "email pattern failed to compile; every email will be rejected");
            None
        }
    }
}

const MIN_PASSWORD_LEN: usize = 6;

/// Sign-in form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInCredentials {
    pub email: String,
    pub password: String,
}

impl SignInCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    /// Check the form rules before anything goes over the wire.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every failing field.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        AuthError::from_field_errors(errors)
    }
}

/// Sign-up form payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpCredentials {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpCredentials {
    /// # Errors
    ///
    /// Returns `AuthError::Validation` listing every failing field.
    pub fn validate(&self) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        check_email(&self.email, &mut errors);
        check_password(&self.password, &mut errors);
        AuthError::from_field_errors(errors)
    }
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    let email = email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !EMAIL_PATTERN.as_ref().is_some_and(|re| re.is_match(email)) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
}

fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new("password", "Password must be at least 6 characters"));
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
