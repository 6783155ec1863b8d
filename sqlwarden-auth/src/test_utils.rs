//! Test utilities for sqlwarden-auth.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! sqlwarden-auth = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use sqlwarden_auth::test_utils::StaticTokenValidator;
//! use sqlwarden_auth::{build_context, Claims};
//!
//! # tokio_test::block_on(async {
//! let validator = StaticTokenValidator::new()
//!     .with_token("tok-reader", Claims::new("reader", ["read"]));
//!
//! let ctx = build_context(Some("Bearer tok-reader"), &validator).await.unwrap();
//! assert!(ctx.is_authenticated());
//! assert_eq!(ctx.subject(), Some("reader"));
//! # });
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::validator::{Claims, TokenValidation, TokenValidator, ValidatorError};

#[derive(Debug, Clone)]
enum Outcome {
    Valid(Claims),
    Failing(String),
}

/// A token validator backed by a fixed table.
///
/// Tokens not in the table validate as invalid with the message
/// `"Unknown token"`. Tokens registered with [`with_failure`](Self::with_failure)
/// make the validator itself fail.
#[derive(Debug, Default)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, Outcome>,
    calls: AtomicUsize,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a valid token.
    pub fn with_token(mut self, token: impl Into<String>, claims: Claims) -> Self {
        self.tokens.insert(token.into(), Outcome::Valid(claims));
        self
    }

    /// Register a token whose validation fails with [`ValidatorError::Unavailable`].
    pub fn with_failure(mut self, token: impl Into<String>, message: impl Into<String>) -> Self {
        self.tokens
            .insert(token.into(), Outcome::Failing(message.into()));
        self
    }

    /// Number of times `validate` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<TokenValidation, ValidatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.tokens.get(token) {
            Some(Outcome::Valid(claims)) => Ok(TokenValidation::Valid(claims.clone())),
            Some(Outcome::Failing(message)) => Err(ValidatorError::Unavailable(message.clone())),
            None => Ok(TokenValidation::invalid("Unknown token")),
        }
    }
}
