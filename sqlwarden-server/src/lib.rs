//! HTTP boundary for a scope-gated database tool server.
//!
//! This crate mounts database tools behind bearer-token authorization from
//! [`sqlwarden_auth`]. Every request is authenticated by the configured
//! [`TokenValidator`](sqlwarden_auth::TokenValidator), every tool call is
//! checked against the minimum tier of the tool's action group, and every
//! failure is rendered as an RFC 6750 challenge.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use sqlwarden_auth::{ActionGroup, MetadataConfig, TokenValidator};
//! use sqlwarden_server::{tool::tool_fn, WardenRouter};
//!
//! # async fn example(validator: Arc<dyn TokenValidator>) -> Result<(), Box<dyn std::error::Error>> {
//! let metadata = MetadataConfig::new("https://db.example.com")
//!     .authorization_server("https://auth.example.com")
//!     .build()?;
//!
//! let app = WardenRouter::from_arc(validator)
//!     .metadata(metadata)
//!     .tool(
//!         "pg_begin",
//!         "Open a transaction",
//!         ActionGroup::Transactions,
//!         tool_fn(|_ctx, _input| async move { Ok(serde_json::json!({"began": true})) }),
//!     )
//!     .build()?;
//!
//! // Serve with axum
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub(crate) mod handler;
pub mod router;
pub(crate) mod state;
pub mod tool;

// Re-exports
pub use error::{BuildError, ServerError, ServerResult};
pub use router::WardenRouter;
pub use tool::{tool_fn, ToolError, ToolHandler};
