//! reqwest-backed `SessionApi`.
//!
//! Every request reads the bearer token from the shared token store at send
//! time, so a token saved by one operation is attached to the next.
//!
//! Responses follow the authority's envelope:
//! `{ "success": bool, "data": {...}, "message": str, "errors": [...] }`.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::types::{AuthSuccess, FieldError, RefreshOutcome, SignInCredentials, SignUpCredentials, User};
use super::{AuthError, DEFAULT_REJECTION_MESSAGE, SessionApi};
use crate::config::SessionConfig;
use crate::store::TokenStore;

pub const REGISTER_PATH: &str = "/auth/register";
pub const LOGIN_PATH: &str = "/auth/login";
pub const LOGOUT_PATH: &str = "/auth/logout";
pub const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
    #[serde(skip)]
    status: u16,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct SessionData {
    user: Option<User>,
    token: Option<String>,
}

/// Error body fields we read from a non-2xx response.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    errors: Vec<FieldError>,
}

pub struct HttpSessionApi {
    http: reqwest::Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl HttpSessionApi {
    /// Build a client against `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Network` if the HTTP client cannot be constructed.
    pub fn new(config: &SessionConfig, store: Arc<dyn TokenStore>) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| AuthError::network(format!("http client build failed: {e}")))?;
        Ok(Self { http, base_url: config.api_base_url.trim_end_matches('/').to_owned(), store })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: Option<&B>) -> Result<Envelope<T>, AuthError>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = self.store.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::debug!(%url, error = %e, "auth request transport failure");
            AuthError::network(e.to_string())
        })?;
        let status = response.status();
        let raw = response.bytes().await.map_err(|e| AuthError::network(e.to_string()))?;

        if !status.is_success() {
            let err = rejection(status.as_u16(), &raw);
            tracing::debug!(%url, status = status.as_u16(), error = %err, "auth request rejected");
            return Err(err);
        }

        let mut envelope: Envelope<T> = if raw.is_empty() {
            Envelope { success: true, data: None, message: None, errors: Vec::new(), status: 0 }
        } else {
            serde_json::from_slice(&raw).map_err(|e| AuthError::InvalidResponse {
                message: format!("unexpected response body: {e}"),
                status: status.as_u16(),
                errors: Vec::new(),
            })?
        };
        envelope.status = status.as_u16();
        if !envelope.success {
            return Err(AuthError::InvalidResponse {
                message: envelope.message.unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_owned()),
                status: envelope.status,
                errors: envelope.errors,
            });
        }
        Ok(envelope)
    }

    async fn authenticate<B>(&self, path: &str, body: &B) -> Result<AuthSuccess, AuthError>
    where
        B: serde::Serialize + ?Sized,
    {
        let envelope: Envelope<SessionData> = self.post(path, Some(body)).await?;
        let status = envelope.status;
        let data = envelope.data.ok_or_else(|| missing_field("data", status))?;
        let user = data.user.ok_or_else(|| missing_field("user", status))?;
        let token = data.token.filter(|t| !t.is_empty()).ok_or_else(|| missing_field("token", status))?;
        Ok(AuthSuccess { user, token })
    }
}

/// Normalize a non-2xx response into `AuthError::Rejected`.
pub(crate) fn rejection(status: u16, raw: &[u8]) -> AuthError {
    let body: ErrorBody = serde_json::from_slice(raw).unwrap_or_default();
    let message = body
        .message
        .or(body.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_owned());
    AuthError::Rejected { message, status, errors: body.errors }
}

fn missing_field(field: &str, status: u16) -> AuthError {
    AuthError::InvalidResponse { message: format!("response missing `{field}`"), status, errors: Vec::new() }
}

#[async_trait::async_trait]
impl SessionApi for HttpSessionApi {
    async fn register(&self, credentials: &SignUpCredentials) -> Result<AuthSuccess, AuthError> {
        self.authenticate(REGISTER_PATH, credentials).await
    }

    async fn login(&self, credentials: &SignInCredentials) -> Result<AuthSuccess, AuthError> {
        self.authenticate(LOGIN_PATH, credentials).await
    }

    async fn logout(&self) -> Result<(), AuthError> {
        self.post::<(), serde_json::Value>(LOGOUT_PATH, None).await?;
        Ok(())
    }

    async fn refresh(&self) -> Result<RefreshOutcome, AuthError> {
        let envelope: Envelope<RefreshOutcome> = self.post::<(), _>(REFRESH_PATH, None).await?;
        let token = envelope.data.and_then(|d| d.token).filter(|t| !t.is_empty());
        Ok(RefreshOutcome { token })
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
