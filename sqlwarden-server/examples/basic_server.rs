//! Basic sqlwarden server with a demo token validator.
//!
//! The validator accepts `demo-<scopes>` tokens, where `<scopes>` is a
//! `+`-separated scope list. Never use it outside local testing.
//!
//! Run with:
//! ```sh
//! cargo run -p sqlwarden-server --example basic_server
//! ```
//!
//! Test with curl:
//! ```sh
//! # 401 with a resource_metadata pointer
//! curl -i -X POST http://localhost:3000/tools/pg_begin
//!
//! # 403 insufficient_scope, scope="write"
//! curl -i -X POST http://localhost:3000/tools/pg_begin -H "Authorization: Bearer demo-read"
//!
//! # 200
//! curl -i -X POST http://localhost:3000/tools/pg_begin -H "Authorization: Bearer demo-write"
//!
//! # Discovery document
//! curl http://localhost:3000/.well-known/oauth-protected-resource
//! ```

use async_trait::async_trait;
use serde_json::json;
use sqlwarden_auth::{
    ActionGroup, Claims, MetadataConfig, TokenValidation, TokenValidator, ValidatorError,
};
use sqlwarden_server::{tool_fn, WardenRouter};

struct DemoValidator;

#[async_trait]
impl TokenValidator for DemoValidator {
    async fn validate(&self, token: &str) -> Result<TokenValidation, ValidatorError> {
        let Some(scopes) = token.strip_prefix("demo-") else {
            return Ok(TokenValidation::invalid("Unknown token"));
        };
        Ok(TokenValidation::Valid(Claims::new(
            "demo-user",
            scopes.split('+'),
        )))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let metadata = MetadataConfig::new("http://localhost:3000")
        .authorization_server("http://localhost:9000")
        .build()?;

    let app = WardenRouter::new(DemoValidator)
        .metadata(metadata)
        .tool(
            "pg_read_query",
            "Run a read-only query",
            ActionGroup::Core,
            tool_fn(|_ctx, input| async move { Ok(json!({ "rows": [], "echo": input })) }),
        )
        .tool(
            "pg_begin",
            "Open a transaction",
            ActionGroup::Transactions,
            tool_fn(|_ctx, _input| async move { Ok(json!({ "began": true })) }),
        )
        .tool(
            "pg_vacuum",
            "Vacuum a table",
            ActionGroup::Admin,
            tool_fn(|_ctx, _input| async move { Ok(json!({ "vacuumed": true })) }),
        )
        .build()?;

    // Start the server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("Server running at http://localhost:3000");
    println!("Tools: GET http://localhost:3000/tools");

    axum::serve(listener, app).await?;

    Ok(())
}
