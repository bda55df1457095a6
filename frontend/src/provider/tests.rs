use super::*;

#[test]
fn unknown_email_codes_map_to_user_not_found() {
    assert_eq!(
        classify_identity_error("EMAIL_NOT_FOUND"),
        AuthFailure::UserNotFound
    );
    assert_eq!(
        classify_identity_error("INVALID_LOGIN_CREDENTIALS"),
        AuthFailure::UserNotFound
    );
}

#[test]
fn password_and_account_codes() {
    assert_eq!(
        classify_identity_error("INVALID_PASSWORD"),
        AuthFailure::WrongPassword
    );
    assert_eq!(
        classify_identity_error("USER_DISABLED"),
        AuthFailure::UserDisabled
    );
    assert_eq!(
        classify_identity_error("TOO_MANY_ATTEMPTS_TRY_LATER"),
        AuthFailure::TooManyAttempts
    );
    assert_eq!(
        classify_identity_error("EMAIL_EXISTS"),
        AuthFailure::EmailExists
    );
    assert_eq!(
        classify_identity_error("INVALID_EMAIL"),
        AuthFailure::InvalidEmail
    );
}

#[test]
fn weak_password_keeps_server_explanation() {
    assert_eq!(
        classify_identity_error("WEAK_PASSWORD : Password should be at least 6 characters"),
        AuthFailure::WeakPassword("Password should be at least 6 characters".to_string())
    );
    assert_eq!(
        classify_identity_error("WEAK_PASSWORD"),
        AuthFailure::WeakPassword("Password is too weak".to_string())
    );
}

#[test]
fn stale_refresh_tokens_mean_signed_out() {
    assert_eq!(
        classify_identity_error("TOKEN_EXPIRED"),
        AuthFailure::NotSignedIn
    );
    assert_eq!(
        classify_identity_error("INVALID_REFRESH_TOKEN"),
        AuthFailure::NotSignedIn
    );
}

#[test]
fn unknown_codes_pass_through() {
    assert_eq!(
        classify_identity_error("OPERATION_NOT_ALLOWED"),
        AuthFailure::Other("OPERATION_NOT_ALLOWED".to_string())
    );
}

#[test]
fn expires_parsing_defaults_to_an_hour() {
    assert_eq!(parse_expires(Some("3600".to_string())), 3600);
    assert_eq!(parse_expires(Some("600".to_string())), 600);
    assert_eq!(parse_expires(Some("abc".to_string())), 3600);
    assert_eq!(parse_expires(None), 3600);
}

#[test]
fn error_body_parsing() {
    let body = r#"{"error":{"code":400,"message":"EMAIL_NOT_FOUND","errors":[]}}"#;
    assert_eq!(failure_from_body(body), AuthFailure::UserNotFound);

    assert_eq!(
        failure_from_body("<html>502</html>"),
        AuthFailure::Other("Authentication service returned an error".to_string())
    );
}
