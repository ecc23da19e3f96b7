use super::*;

// =============================================================================
// User
// =============================================================================

#[test]
fn user_accepts_numeric_and_string_ids() {
    let user: User = serde_json::from_value(serde_json::json!({"id": 1, "email": "a@b.com"})).unwrap();
    assert_eq!(user.id, UserId::Int(1));

    let user: User = serde_json::from_value(serde_json::json!({"id": "u-7"})).unwrap();
    assert_eq!(user.id, UserId::Text("u-7".into()));
    assert!(user.email.is_none());
}

#[test]
fn user_keeps_unknown_fields() {
    let raw = serde_json::json!({"id": 1, "email": "a@b.com", "safetyScore": 87, "city": "Pune"});
    let user: User = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(user.extra.get("safetyScore"), Some(&serde_json::json!(87)));
    assert_eq!(serde_json::to_value(&user).unwrap(), raw);
}

#[test]
fn display_name_falls_back_to_email_then_id() {
    let mut user: User = serde_json::from_value(serde_json::json!({"id": 5})).unwrap();
    assert_eq!(user.display_name(), "5");
    user.email = Some("a@b.com".into());
    assert_eq!(user.display_name(), "a@b.com");
    user.name = Some("Asha".into());
    assert_eq!(user.display_name(), "Asha");
}

// =============================================================================
// Credential validation
// =============================================================================

#[test]
fn email_pattern_compiles() {
    let re = compile_email_pattern().unwrap();
    assert!(re.is_match("a@b.com"));
    assert!(!re.is_match("a@b"));
    assert!(EMAIL_PATTERN.is_some());
}

#[test]
fn valid_sign_in_passes() {
    assert!(SignInCredentials::new("a@b.com", "secret1").validate().is_ok());
}

#[test]
fn email_pattern_is_case_insensitive() {
    assert!(SignInCredentials::new("Asha.K+safe@Example.ORG", "secret1").validate().is_ok());
}

#[test]
fn missing_fields_are_all_reported() {
    let err = SignInCredentials::new("", "").validate().unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[FieldError::new("email", "Email is required"), FieldError::new("password", "Password is required")]
    );
    assert_eq!(err.status_code(), crate::api::VALIDATION_STATUS);
}

#[test]
fn malformed_email_and_short_password() {
    let err = SignInCredentials::new("not-an-email", "12345").validate().unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[
            FieldError::new("email", "Invalid email address"),
            FieldError::new("password", "Password must be at least 6 characters"),
        ]
    );
}

#[test]
fn email_without_tld_is_rejected() {
    let err = SignInCredentials::new("a@b", "secret1").validate().unwrap_err();
    assert_eq!(err.field_errors()[0].field, "email");
}

#[test]
fn sign_up_requires_name() {
    let creds = SignUpCredentials { name: "  ".into(), email: "a@b.com".into(), password: "secret1".into() };
    let err = creds.validate().unwrap_err();
    assert_eq!(err.field_errors(), &[FieldError::new("name", "Name is required")]);
}
