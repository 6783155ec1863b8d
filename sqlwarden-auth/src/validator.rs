//! Token validator seam.
//!
//! Signature verification, key discovery and caching live outside this
//! crate. The authorization core only talks to them through the
//! [`TokenValidator`] trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scope::{parse_scopes, Scope};

/// Claims extracted from a validated credential.
///
/// Field names follow JWT conventions (`sub`, `scope`, `iat`, `exp`) so a
/// decoded token payload deserializes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier.
    #[serde(rename = "sub")]
    pub subject: String,

    /// Space-separated granted scopes, exactly as they appeared on the wire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Issued-at, seconds since the Unix epoch.
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,

    /// Expiry, seconds since the Unix epoch.
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl Claims {
    /// Create claims for a subject with the given scope tokens.
    pub fn new<I, S>(subject: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = scopes
            .into_iter()
            .map(|s| s.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            subject: subject.into(),
            scope: Some(joined),
            issued_at: None,
            expires_at: None,
        }
    }

    /// Set issued-at and expiry timestamps.
    pub fn with_times(mut self, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at.timestamp());
        self.expires_at = Some(expires_at.timestamp());
        self
    }

    /// Parse the scope claim into structured scopes.
    pub fn scopes(&self) -> Vec<Scope> {
        parse_scopes(self.scope.as_deref())
            .iter()
            .map(|token| Scope::parse(token))
            .collect()
    }

    pub fn issued_at_time(&self) -> Option<DateTime<Utc>> {
        self.issued_at.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn expires_at_time(&self) -> Option<DateTime<Utc>> {
        self.expires_at.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Outcome of validating a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenValidation {
    /// The credential is valid and carries these claims.
    Valid(Claims),

    /// The credential was rejected (bad signature, expired, unknown issuer...).
    Invalid {
        /// Validator-supplied reason, surfaced to the caller in 401 responses.
        message: String,
    },
}

impl TokenValidation {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, TokenValidation::Valid(_))
    }

    pub fn claims(&self) -> Option<&Claims> {
        match self {
            TokenValidation::Valid(claims) => Some(claims),
            TokenValidation::Invalid { .. } => None,
        }
    }
}

/// The validator itself failed to produce an outcome.
///
/// These are never reclassified by the authorization core. They propagate to
/// the transport boundary and render as an unclassified server error.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// Key discovery or issuer metadata could not be reached.
    #[error("token validator unavailable: {0}")]
    Unavailable(String),

    /// The validation call did not finish in time.
    #[error("token validation timed out")]
    TimedOut,

    #[error("token validator error: {0}")]
    Internal(String),
}

/// Verifies a raw credential and returns its claims.
///
/// This is the only place the authorization core may suspend.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Validate an opaque bearer credential.
    async fn validate(&self, token: &str) -> Result<TokenValidation, ValidatorError>;
}

#[async_trait]
impl<T: TokenValidator + ?Sized> TokenValidator for std::sync::Arc<T> {
    async fn validate(&self, token: &str) -> Result<TokenValidation, ValidatorError> {
        (**self).validate(token).await
    }
}
