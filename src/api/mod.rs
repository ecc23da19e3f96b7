//! Session API client: the remote authority behind sign-up, sign-in,
//! sign-out and token refresh.
//!
//! DESIGN
//! ======
//! The state machine only talks to the `SessionApi` trait. `HttpSessionApi`
//! is the production implementation; tests substitute in-memory stubs.
//!
//! ERROR HANDLING
//! ==============
//! Every failure reaching the state machine is an `AuthError`. Transport
//! failures and application-level rejections are distinct variants so the
//! UI can tell "check your connection" apart from "bad password".

pub mod http;
pub mod types;

use serde::{Deserialize, Serialize};

pub use http::HttpSessionApi;
pub use types::{AuthSuccess, FieldError, RefreshOutcome, SignInCredentials, SignUpCredentials, User, UserId};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
pub const VALIDATION_ERROR_MESSAGE: &str = "Please correct the highlighted fields";
pub const DEFAULT_REJECTION_MESSAGE: &str = "Something went wrong";

/// Status reported for client-side validation failures.
pub const VALIDATION_STATUS: u16 = 422;

// =============================================================================
// ERROR
// =============================================================================

/// Structured failure from an auth operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthError {
    /// Credentials failed client-side checks; nothing was sent.
    #[error("{message}")]
    Validation { message: String, errors: Vec<FieldError> },

    /// The authority answered with a non-2xx status.
    #[error("{message}")]
    Rejected { message: String, status: u16, errors: Vec<FieldError> },

    /// No response was obtained (connect, DNS, timeout).
    #[error("{message}")]
    Network { message: String, detail: String },

    /// The authority answered 2xx but the body cannot back a session.
    #[error("{message}")]
    InvalidResponse {
        message: String,
        status: u16,
        #[serde(default)]
        errors: Vec<FieldError>,
    },
}

impl AuthError {
    pub(crate) fn from_field_errors(errors: Vec<FieldError>) -> Result<(), Self> {
        if errors.is_empty() {
            return Ok(());
        }
        Err(Self::Validation { message: VALIDATION_ERROR_MESSAGE.to_owned(), errors })
    }

    #[must_use]
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network { message: NETWORK_ERROR_MESSAGE.to_owned(), detail: detail.into() }
    }

    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into(), status, errors: Vec::new() }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Rejected { message, .. }
            | Self::Network { message, .. }
            | Self::InvalidResponse { message, .. } => message,
        }
    }

    /// Numeric status; 0 when no response was obtained.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => VALIDATION_STATUS,
            Self::Rejected { status, .. } | Self::InvalidResponse { status, .. } => *status,
            Self::Network { .. } => 0,
        }
    }

    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation { errors, .. } | Self::Rejected { errors, .. } | Self::InvalidResponse { errors, .. } => {
                errors
            }
            Self::Network { .. } => &[],
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "E_VALIDATION",
            Self::Rejected { .. } => "E_REJECTED",
            Self::Network { .. } => "E_NETWORK",
            Self::InvalidResponse { .. } => "E_INVALID_RESPONSE",
        }
    }

    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Rejected { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// CLIENT TRAIT
// =============================================================================

/// Remote authority operations consumed by the session state machine.
///
/// Implementations attach the current bearer token themselves; callers never
/// pass it in.
#[async_trait::async_trait]
pub trait SessionApi: Send + Sync {
    async fn register(&self, credentials: &SignUpCredentials) -> Result<AuthSuccess, AuthError>;

    async fn login(&self, credentials: &SignInCredentials) -> Result<AuthSuccess, AuthError>;

    async fn logout(&self) -> Result<(), AuthError>;

    async fn refresh(&self) -> Result<RefreshOutcome, AuthError>;
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
