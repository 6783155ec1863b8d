//! Per-request authorization context.

use crate::scope::Scope;
use crate::validator::{Claims, TokenValidation, TokenValidator, ValidatorError};

const BEARER_SCHEME: &str = "Bearer";

/// Extract the credential from an `Authorization` header value.
///
/// The header must be exactly `Bearer <credential>` (scheme keyword is
/// case-insensitive). Any other shape yields `None`; this never fails.
///
/// ```rust
/// use sqlwarden_auth::extract_bearer_token;
///
/// assert_eq!(extract_bearer_token(Some("Bearer tok123")), Some("tok123"));
/// assert_eq!(extract_bearer_token(Some("bearer tok123")), Some("tok123"));
/// assert_eq!(extract_bearer_token(Some("Basic tok")), None);
/// assert_eq!(extract_bearer_token(Some("Bearer a b")), None);
/// assert_eq!(extract_bearer_token(Some("Bearer ")), None);
/// assert_eq!(extract_bearer_token(None), None);
/// ```
pub fn extract_bearer_token(header: Option<&str>) -> Option<&str> {
    let mut parts = header?.split_whitespace();
    let scheme = parts.next()?;
    let credential = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    Some(credential)
}

/// The immutable result of interpreting a request's credential.
///
/// Only [`AuthContext::unauthenticated`] and [`AuthContext::authenticated`]
/// construct one, so an unauthenticated context never carries claims or
/// scopes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    authenticated: bool,
    claims: Option<Claims>,
    scopes: Vec<Scope>,
}

impl AuthContext {
    pub fn unauthenticated() -> Self {
        Self {
            authenticated: false,
            claims: None,
            scopes: Vec::new(),
        }
    }

    /// Build an authenticated context; scopes come from the claims.
    pub fn authenticated(claims: Claims) -> Self {
        let scopes = claims.scopes();
        Self {
            authenticated: true,
            claims: Some(claims),
            scopes,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn subject(&self) -> Option<&str> {
        self.claims.as_ref().map(|c| c.subject.as_str())
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::unauthenticated()
    }
}

/// Build the authorization context for one request.
///
/// - No credential: unauthenticated, and the validator is not called.
/// - Validator says invalid: unauthenticated; the reason is dropped here.
/// - Valid: authenticated with the claims' scopes.
///
/// # Errors
///
/// Failures of the validator itself are returned unchanged.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use sqlwarden_auth::{build_context, Claims, TokenValidation, TokenValidator, ValidatorError};
///
/// struct OnlyAlice;
///
/// #[async_trait]
/// impl TokenValidator for OnlyAlice {
///     async fn validate(&self, token: &str) -> Result<TokenValidation, ValidatorError> {
///         if token == "alice-token" {
///             Ok(TokenValidation::Valid(Claims::new("alice", ["read"])))
///         } else {
///             Ok(TokenValidation::invalid("Unknown token"))
///         }
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let ctx = build_context(Some("Bearer alice-token"), &OnlyAlice).await.unwrap();
/// assert_eq!(ctx.subject(), Some("alice"));
///
/// let ctx = build_context(Some("Bearer mallory"), &OnlyAlice).await.unwrap();
/// assert!(!ctx.is_authenticated());
/// # });
/// ```
pub async fn build_context<V>(
    header: Option<&str>,
    validator: &V,
) -> Result<AuthContext, ValidatorError>
where
    V: TokenValidator + ?Sized,
{
    let Some(token) = extract_bearer_token(header) else {
        log::debug!("no bearer credential on request");
        return Ok(AuthContext::unauthenticated());
    };

    match validator.validate(token).await? {
        TokenValidation::Valid(claims) => {
            log::debug!("authenticated subject '{}'", claims.subject);
            Ok(AuthContext::authenticated(claims))
        }
        TokenValidation::Invalid { message } => {
            log::debug!("credential rejected: {}", message);
            Ok(AuthContext::unauthenticated())
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
