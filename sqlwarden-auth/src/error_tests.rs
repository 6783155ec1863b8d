//! Tests for the error taxonomy and wire rendering.

use super::*;

fn scopes(raw: &[&str]) -> Vec<Scope> {
    raw.iter().map(|s| Scope::parse(s)).collect()
}

#[derive(Debug, thiserror::Error)]
#[error("database connection string postgres://admin:hunter2@db leaked")]
struct LeakyError;

#[derive(Debug, thiserror::Error)]
#[error("tool failed")]
struct WrappingError(#[source] AuthError);

#[test]
fn test_codes_and_statuses() {
    let cases = [
        (AuthError::missing(), "invalid_token", StatusCode::UNAUTHORIZED),
        (AuthError::invalid("expired"), "invalid_token", StatusCode::UNAUTHORIZED),
        (
            AuthError::insufficient(scopes(&["write"])),
            "insufficient_scope",
            StatusCode::FORBIDDEN,
        ),
    ];

    for (err, code, status) in cases {
        assert_eq!(err.code(), code);
        assert_eq!(err.status(), status);
    }
}

#[test]
fn test_display() {
    assert_eq!(AuthError::missing().to_string(), "Missing bearer token");
    assert_eq!(AuthError::invalid("Token expired").to_string(), "Token expired");
    assert_eq!(
        AuthError::insufficient(scopes(&["write", "db:sales"])).to_string(),
        "insufficient scope: requires one of [write db:sales]"
    );
}

#[test]
fn test_required_permissions() {
    let err = AuthError::insufficient(scopes(&["admin"]));
    assert_eq!(err.required_permissions(), scopes(&["admin"]).as_slice());
    assert!(AuthError::missing().required_permissions().is_empty());
}

#[test]
fn test_render_missing_echoes_message() {
    let response = render_error(&AuthError::missing());
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body.error, "invalid_token");
    assert_eq!(response.body.error_description, "Missing bearer token");
    assert!(response.body.scope.is_none());
}

#[test]
fn test_render_invalid_echoes_validator_message() {
    let response = render_error(&AuthError::invalid("Token expired"));
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body.error, "invalid_token");
    assert_eq!(response.body.error_description, "Token expired");
}

#[test]
fn test_render_insufficient_joins_scopes() {
    let response = render_error(&AuthError::insufficient(scopes(&["write", "admin"])));
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body.error, "insufficient_scope");
    assert_eq!(response.body.scope.as_deref(), Some("write admin"));
}

#[test]
fn test_render_unclassified_hides_details() {
    let response = render_error(&LeakyError);
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body.error, "server_error");
    assert!(!response.body.error_description.contains("hunter2"));
}

#[test]
fn test_render_validator_failure_is_unclassified() {
    let err = AuthorizeError::Validator(ValidatorError::Internal("secret detail".into()));
    let response = render_error(&err);
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.body.error_description.contains("secret detail"));
}

#[test]
fn test_render_finds_auth_error_through_wrappers() {
    let wrapped = AuthorizeError::Auth(AuthError::missing());
    assert_eq!(render_error(&wrapped).status, StatusCode::UNAUTHORIZED);

    let sourced = WrappingError(AuthError::insufficient(scopes(&["read"])));
    assert_eq!(render_error(&sourced).status, StatusCode::FORBIDDEN);
}

#[test]
fn test_body_serialization() {
    let body = render_error(&AuthError::insufficient(scopes(&["write"]))).body;
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["error"], "insufficient_scope");
    assert_eq!(json["scope"], "write");

    let body = render_error(&AuthError::missing()).body;
    let json = serde_json::to_value(&body).unwrap();
    assert!(json.get("scope").is_none());
    assert_eq!(json["error_description"], "Missing bearer token");
}

#[test]
fn test_www_authenticate_missing_is_bare() {
    assert_eq!(AuthError::missing().www_authenticate(None), "Bearer");
    assert_eq!(
        AuthError::missing().www_authenticate(Some("https://db.example.com/.well-known/oauth-protected-resource")),
        "Bearer resource_metadata=\"https://db.example.com/.well-known/oauth-protected-resource\""
    );
}

#[test]
fn test_www_authenticate_invalid_and_insufficient() {
    assert_eq!(
        AuthError::invalid("bad \"sig\"").www_authenticate(None),
        "Bearer error=\"invalid_token\", error_description=\"bad 'sig'\""
    );
    assert_eq!(
        AuthError::insufficient(scopes(&["write", "db:x"])).www_authenticate(None),
        "Bearer error=\"insufficient_scope\", scope=\"write db:x\""
    );
}

#[test]
fn test_www_authenticate_strips_control_characters() {
    let challenge = AuthError::invalid("Token expired\nat 12:00\r\t\u{7f}").www_authenticate(None);
    assert_eq!(
        challenge,
        "Bearer error=\"invalid_token\", error_description=\"Token expired at 12:00   \""
    );
    assert!(!challenge.chars().any(char::is_control));
}

#[test]
fn test_error_types_are_send_sync() {
    fn is_send_sync<T: Send + Sync>() {}
    is_send_sync::<AuthError>();
    is_send_sync::<AuthorizeError>();
}
