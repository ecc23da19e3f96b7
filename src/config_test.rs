use std::sync::Mutex;

use super::*;

// Env vars are process-global; serialize every test that touches them.
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// # Safety
/// Callers hold `ENV_LOCK`, so no other test mutates the env concurrently.
unsafe fn clear_session_env() {
    unsafe {
        std::env::remove_var("SAFE_API_BASE_URL");
        std::env::remove_var("SAFE_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("SAFE_CONNECT_TIMEOUT_SECS");
        std::env::remove_var("SAFE_STORAGE_NAMESPACE");
        std::env::remove_var("SAFE_STORAGE_PATH");
    }
}

#[test]
fn from_env_defaults() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_session_env() };

    let cfg = SessionConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(cfg.timeouts, RequestTimeouts { request_secs: 10, connect_secs: 5 });
    assert_eq!(cfg.storage_namespace, "safe");
    assert!(cfg.storage_path.ends_with("safe/session.json"));
    assert_eq!(cfg.storage_keys().token, "safe_auth_token");
}

#[test]
fn from_env_parses_overrides() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SAFE_API_BASE_URL", "http://localhost:8080/v1/");
        std::env::set_var("SAFE_REQUEST_TIMEOUT_SECS", "30");
        std::env::set_var("SAFE_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("SAFE_STORAGE_NAMESPACE", "staging");
        std::env::set_var("SAFE_STORAGE_PATH", "/tmp/safe-test/session.json");
    }

    let cfg = SessionConfig::from_env().unwrap();
    assert_eq!(cfg.api_base_url, "http://localhost:8080/v1");
    assert_eq!(cfg.timeouts, RequestTimeouts { request_secs: 30, connect_secs: 2 });
    assert_eq!(cfg.storage_keys(), StorageKeys::new("staging"));
    assert_eq!(cfg.storage_path, PathBuf::from("/tmp/safe-test/session.json"));

    unsafe { clear_session_env() };
}

#[test]
fn from_env_bad_numbers_fall_back_to_defaults() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SAFE_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("SAFE_CONNECT_TIMEOUT_SECS", "-1");
    }

    let cfg = SessionConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts, RequestTimeouts::default());

    unsafe { clear_session_env() };
}

#[test]
fn from_env_rejects_schemeless_base_url() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SAFE_API_BASE_URL", "api.safeindia.gov.in/v1");
    }

    let err = SessionConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidBaseUrl(_)));

    unsafe { clear_session_env() };
}

#[test]
fn from_env_rejects_empty_namespace() {
    let _lock = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SAFE_STORAGE_NAMESPACE", "   ");
    }

    let err = SessionConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("SAFE_STORAGE_NAMESPACE"));

    unsafe { clear_session_env() };
}

#[test]
fn with_base_url_validates() {
    let cfg = SessionConfig::default().with_base_url("https://example.test/api/").unwrap();
    assert_eq!(cfg.api_base_url, "https://example.test/api");
    assert!(SessionConfig::default().with_base_url("ftp://example.test").is_err());
}
