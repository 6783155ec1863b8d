//! Tests for the router builder.
//!
//! These cover builder validation and route registration. Request-level
//! authorization is exercised in `tests/integration_tests.rs`.

use crate::error::BuildError;
use crate::router::WardenRouter;
use crate::tool::tool_fn;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use sqlwarden_auth::test_utils::StaticTokenValidator;
use sqlwarden_auth::{ActionGroup, Claims, MetadataConfig, TokenValidator};
use std::sync::Arc;
use tower::ServiceExt;

fn echo_router() -> WardenRouter {
    WardenRouter::new(
        StaticTokenValidator::new().with_token("reader", Claims::new("alice", ["read"])),
    )
    .tool(
        "pg_echo",
        "Echo the input",
        ActionGroup::Core,
        tool_fn(|_ctx, input| async move { Ok(input) }),
    )
}

#[test]
fn test_router_builder_type_signature() {
    fn _accepts_validator_arc(_: impl FnOnce(Arc<dyn TokenValidator>) -> WardenRouter) {}

    _accepts_validator_arc(WardenRouter::from_arc);
}

#[test]
fn test_build_without_tools_fails() {
    let result = WardenRouter::new(StaticTokenValidator::new()).build();
    assert!(matches!(result, Err(BuildError::NoTools)));
}

#[test]
fn test_build_with_duplicate_tool_fails() {
    let result = echo_router()
        .tool(
            "pg_echo",
            "Echo again",
            "transactions",
            tool_fn(|_ctx, input| async move { Ok(input) }),
        )
        .build();

    match result {
        Err(BuildError::DuplicateTool(name)) => assert_eq!(name, "pg_echo"),
        other => panic!("expected DuplicateTool, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_build_nested_propagates_errors() {
    let result = WardenRouter::new(StaticTokenValidator::new()).build_nested("/db");
    assert!(matches!(result, Err(BuildError::NoTools)));
}

#[tokio::test]
async fn test_nested_routes_live_under_prefix() {
    let app = echo_router().build_nested("/db").unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/db/tools")
                .header("Authorization", "Bearer reader")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/tools")
                .header("Authorization", "Bearer reader")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metadata_route_only_when_configured() {
    let request = || {
        Request::builder()
            .uri("/.well-known/oauth-protected-resource")
            .body(Body::empty())
            .unwrap()
    };

    let without = echo_router().build().unwrap();
    let response = without.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let metadata = MetadataConfig::new("https://db.example.com")
        .authorization_server("https://auth.example.com")
        .build()
        .unwrap();
    let with = echo_router().metadata(metadata).build().unwrap();
    let response = with.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_metadata_route_follows_resource_path() {
    let metadata = MetadataConfig::new("https://db.example.com/mcp")
        .build()
        .unwrap();
    let app = echo_router().metadata(metadata).build().unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/.well-known/oauth-protected-resource/mcp")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_nested_router_keeps_metadata_at_origin() {
    let metadata = MetadataConfig::new("https://db.example.com")
        .authorization_server("https://auth.example.com")
        .build()
        .unwrap();
    let app = echo_router()
        .metadata(metadata)
        .build_nested("/db")
        .unwrap();

    let get = |uri: &str| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let response = app
        .clone()
        .oneshot(get("/.well-known/oauth-protected-resource"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/db/.well-known/oauth-protected-resource"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Challenges from nested routes still point at the served document.
    let response = app.oneshot(get("/db/tools")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer resource_metadata=\"https://db.example.com/.well-known/oauth-protected-resource\""
    );
}
