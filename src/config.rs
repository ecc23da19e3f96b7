//! Session configuration parsed from environment variables.

use std::path::PathBuf;

use crate::store::{DEFAULT_NAMESPACE, StorageKeys};

pub const DEFAULT_API_BASE_URL: &str = "https://api.safeindia.gov.in/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_STORAGE_FILE: &str = "session.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("config parse failed: {0}")]
    ConfigParse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for RequestTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub api_base_url: String,
    pub timeouts: RequestTimeouts,
    pub storage_namespace: String,
    pub storage_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: RequestTimeouts::default(),
            storage_namespace: DEFAULT_NAMESPACE.to_owned(),
            storage_path: default_storage_path(),
        }
    }
}

impl SessionConfig {
    /// Build typed session config from environment variables.
    ///
    /// Optional:
    /// - `SAFE_API_BASE_URL`: authority base URL, default production API
    /// - `SAFE_REQUEST_TIMEOUT_SECS`: default 10
    /// - `SAFE_CONNECT_TIMEOUT_SECS`: default 5
    /// - `SAFE_STORAGE_NAMESPACE`: slot key prefix, default `safe`
    /// - `SAFE_STORAGE_PATH`: token file, default `<config dir>/safe/session.json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a base URL without an http(s) scheme or an
    /// empty namespace.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = normalize_base_url(&env_or("SAFE_API_BASE_URL", DEFAULT_API_BASE_URL))?;
        let timeouts = RequestTimeouts {
            request_secs: env_parse_u64("SAFE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("SAFE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        let storage_namespace = env_or("SAFE_STORAGE_NAMESPACE", DEFAULT_NAMESPACE).trim().to_owned();
        if storage_namespace.is_empty() {
            return Err(ConfigError::ConfigParse("SAFE_STORAGE_NAMESPACE must not be empty".into()));
        }
        let storage_path = match std::env::var("SAFE_STORAGE_PATH") {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_storage_path(),
        };

        Ok(Self { api_base_url, timeouts, storage_namespace, storage_path })
    }

    /// Override the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` for a URL without an http(s) scheme.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn storage_keys(&self) -> StorageKeys {
        StorageKeys::new(&self.storage_namespace)
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_owned()));
    }
    Ok(trimmed.to_owned())
}

fn default_storage_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DEFAULT_NAMESPACE)
        .join(DEFAULT_STORAGE_FILE)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
