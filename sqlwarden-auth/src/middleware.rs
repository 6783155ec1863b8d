//! Decision functions used by request handlers.
//!
//! [`validate_and_require`] combines extraction, validation and an optional
//! scope check in one call. The `require_*` assertions run against a context
//! that has already been built and are fully synchronous.
//!
//! # Example
//!
//! ```rust
//! use sqlwarden_auth::{require_group, ActionGroupMap, AuthContext, AuthError, Claims};
//!
//! let groups = ActionGroupMap::default();
//! let ctx = AuthContext::authenticated(Claims::new("reader", ["read"]));
//!
//! assert!(require_group(&ctx, &groups, "core").is_ok());
//! assert!(matches!(
//!     require_group(&ctx, &groups, "transactions"),
//!     Err(AuthError::InsufficientPermission { .. })
//! ));
//! ```

use crate::context::{build_context, extract_bearer_token, AuthContext};
use crate::error::{AuthError, AuthResult, AuthorizeError};
use crate::groups::ActionGroupMap;
use crate::resolver::{satisfies, satisfies_any};
use crate::scope::Scope;
use crate::validator::{TokenValidation, TokenValidator};

/// Options for [`validate_and_require`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequireOptions {
    /// Reject requests without a credential. Defaults to `true`.
    pub required: bool,

    /// If non-empty, at least one of these must be satisfied.
    pub required_permissions: Vec<Scope>,
}

impl Default for RequireOptions {
    fn default() -> Self {
        Self {
            required: true,
            required_permissions: Vec::new(),
        }
    }
}

impl RequireOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let requests without a credential through as unauthenticated.
    pub fn optional() -> Self {
        Self {
            required: false,
            ..Self::default()
        }
    }

    pub fn with_permission(mut self, scope: impl Into<Scope>) -> Self {
        self.required_permissions.push(scope.into());
        self
    }

    pub fn with_permissions<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        self.required_permissions
            .extend(scopes.into_iter().map(Into::into));
        self
    }
}

/// Extract, validate and check a request's credential in one call.
///
/// # Errors
///
/// - [`AuthError::CredentialMissing`] when there is no credential and
///   `options.required` is set.
/// - [`AuthError::CredentialInvalid`] with the validator's message.
/// - [`AuthError::InsufficientPermission`] when none of
///   `options.required_permissions` is satisfied.
/// - [`AuthorizeError::Validator`] when the validator itself fails.
pub async fn validate_and_require<V>(
    header: Option<&str>,
    validator: &V,
    options: &RequireOptions,
) -> Result<AuthContext, AuthorizeError>
where
    V: TokenValidator + ?Sized,
{
    let Some(token) = extract_bearer_token(header) else {
        if options.required {
            log::debug!("rejecting request without bearer credential");
            return Err(AuthError::missing().into());
        }
        return Ok(AuthContext::unauthenticated());
    };

    let claims = match validator.validate(token).await {
        Ok(TokenValidation::Valid(claims)) => claims,
        Ok(TokenValidation::Invalid { message }) => {
            log::debug!("credential rejected: {}", message);
            return Err(AuthError::invalid(message).into());
        }
        Err(e) => {
            log::warn!("token validator failed: {}", e);
            return Err(e.into());
        }
    };

    let ctx = AuthContext::authenticated(claims);
    if !options.required_permissions.is_empty()
        && !satisfies_any(ctx.scopes(), &options.required_permissions)
    {
        log::warn!(
            "subject '{}' lacks required scope",
            ctx.subject().unwrap_or_default()
        );
        return Err(AuthError::insufficient(options.required_permissions.clone()).into());
    }
    Ok(ctx)
}

/// Build a context without enforcing anything. See [`build_context`].
pub async fn authenticate<V>(
    header: Option<&str>,
    validator: &V,
) -> Result<AuthContext, AuthorizeError>
where
    V: TokenValidator + ?Sized,
{
    Ok(build_context(header, validator).await?)
}

/// Require a single scope.
pub fn require_permission(ctx: &AuthContext, scope: &Scope) -> AuthResult<()> {
    ensure_authenticated(ctx)?;
    if satisfies(ctx.scopes(), scope) {
        Ok(())
    } else {
        Err(AuthError::insufficient(vec![scope.clone()]))
    }
}

/// Require at least one of `scopes`.
pub fn require_any_permission(ctx: &AuthContext, scopes: &[Scope]) -> AuthResult<()> {
    ensure_authenticated(ctx)?;
    if satisfies_any(ctx.scopes(), scopes) {
        Ok(())
    } else {
        Err(AuthError::insufficient(scopes.to_vec()))
    }
}

/// Require at least one of the named tiers or resource patterns.
///
/// Tier names (`read`, `write`, `admin`, `full`) map to their tier; any other
/// string, such as `table:public:users`, is checked as given.
pub fn require_action_group_permission<S>(ctx: &AuthContext, requested: &[S]) -> AuthResult<()>
where
    S: AsRef<str>,
{
    let scopes: Vec<Scope> = requested
        .iter()
        .map(|name| Scope::parse(name.as_ref()))
        .collect();
    require_any_permission(ctx, &scopes)
}

/// Require the minimum tier of an action group.
pub fn require_group(ctx: &AuthContext, groups: &ActionGroupMap, group: &str) -> AuthResult<()> {
    let tier = groups.required_tier_for(group);
    require_action_group_permission(ctx, &[tier.as_str()])
}

fn ensure_authenticated(ctx: &AuthContext) -> AuthResult<()> {
    if ctx.is_authenticated() {
        Ok(())
    } else {
        Err(AuthError::missing())
    }
}

#[cfg(test)]
#[path = "middleware_tests.rs"]
mod tests;
