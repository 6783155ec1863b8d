//! Authorization errors and their wire representation.
//!
//! | Kind | Code | HTTP |
//! |------|------|------|
//! | [`AuthError::CredentialMissing`] | `invalid_token` | 401 |
//! | [`AuthError::CredentialInvalid`] | `invalid_token` | 401 |
//! | [`AuthError::InsufficientPermission`] | `insufficient_scope` | 403 |
//! | anything else | `server_error` | 500 |
//!
//! Errors are raised by the decision functions and rendered exactly once, at
//! the transport boundary, by [`render_error`].

use http::StatusCode;
use serde::Serialize;

use crate::scope::Scope;
use crate::validator::ValidatorError;

const MISSING_CREDENTIAL_MESSAGE: &str = "Missing bearer token";
const INSUFFICIENT_SCOPE_MESSAGE: &str = "Insufficient scope for this operation";
const SERVER_ERROR_MESSAGE: &str = "An internal server error occurred";

/// A classified authorization failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No usable credential on a request that requires one.
    #[error("{0}")]
    CredentialMissing(String),

    /// The validator rejected the credential.
    #[error("{0}")]
    CredentialInvalid(String),

    /// Authenticated, but none of the required scopes are granted.
    #[error("insufficient scope: requires one of [{}]", join_scopes(.required))]
    InsufficientPermission {
        /// The scopes that would have satisfied the check.
        required: Vec<Scope>,
    },
}

impl AuthError {
    /// A missing-credential error with the default message.
    pub fn missing() -> Self {
        Self::CredentialMissing(MISSING_CREDENTIAL_MESSAGE.to_string())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::CredentialInvalid(message.into())
    }

    pub fn insufficient(required: impl Into<Vec<Scope>>) -> Self {
        Self::InsufficientPermission {
            required: required.into(),
        }
    }

    /// Machine-readable error code (RFC 6750).
    pub const fn code(&self) -> &'static str {
        match self {
            Self::CredentialMissing(_) | Self::CredentialInvalid(_) => "invalid_token",
            Self::InsufficientPermission { .. } => "insufficient_scope",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::CredentialMissing(_) | Self::CredentialInvalid(_) => StatusCode::UNAUTHORIZED,
            Self::InsufficientPermission { .. } => StatusCode::FORBIDDEN,
        }
    }

    /// The scopes an insufficient-permission error asked for. Empty otherwise.
    pub fn required_permissions(&self) -> &[Scope] {
        match self {
            Self::InsufficientPermission { required } => required,
            _ => &[],
        }
    }

    /// Render the `WWW-Authenticate` challenge for this error.
    ///
    /// A missing credential gets a bare challenge without an error code, as
    /// RFC 6750 §3.1 asks for requests that carried no authentication.
    pub fn www_authenticate(&self, resource_metadata: Option<&str>) -> String {
        let mut params = Vec::new();
        match self {
            Self::CredentialMissing(_) => {}
            Self::CredentialInvalid(message) => {
                params.push(format!("error=\"{}\"", self.code()));
                params.push(format!("error_description=\"{}\"", quote_safe(message)));
            }
            Self::InsufficientPermission { required } => {
                params.push(format!("error=\"{}\"", self.code()));
                params.push(format!("scope=\"{}\"", quote_safe(&join_scopes(required))));
            }
        }
        if let Some(url) = resource_metadata {
            params.push(format!("resource_metadata=\"{}\"", quote_safe(url)));
        }
        if params.is_empty() {
            "Bearer".to_string()
        } else {
            format!("Bearer {}", params.join(", "))
        }
    }
}

/// Failure of [`validate_and_require`](crate::validate_and_require).
///
/// Validator failures stay a separate variant so they are never mistaken
/// for a classified authorization error.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizeError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// JSON body of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub error_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Status and body for a transport-level error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: StatusCode,
    pub body: ErrorBody,
}

/// Render any error into a protocol-compliant response.
///
/// The error and its `source()` chain are searched for an [`AuthError`].
/// Anything unclassified becomes a 500 with a generic description, so
/// internal error text never leaks.
pub fn render_error(err: &(dyn std::error::Error + 'static)) -> ErrorResponse {
    match find_auth_error(err) {
        Some(auth) => render_auth_error(auth),
        None => ErrorResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                error: "server_error",
                error_description: SERVER_ERROR_MESSAGE.to_string(),
                scope: None,
            },
        },
    }
}

fn render_auth_error(err: &AuthError) -> ErrorResponse {
    let body = match err {
        AuthError::CredentialMissing(message) | AuthError::CredentialInvalid(message) => {
            ErrorBody {
                error: err.code(),
                error_description: message.clone(),
                scope: None,
            }
        }
        AuthError::InsufficientPermission { required } => ErrorBody {
            error: err.code(),
            error_description: INSUFFICIENT_SCOPE_MESSAGE.to_string(),
            scope: Some(join_scopes(required)),
        },
    };
    ErrorResponse {
        status: err.status(),
        body,
    }
}

fn find_auth_error<'a>(err: &'a (dyn std::error::Error + 'static)) -> Option<&'a AuthError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(auth) = e.downcast_ref::<AuthError>() {
            return Some(auth);
        }
        if let Some(AuthorizeError::Auth(auth)) = e.downcast_ref::<AuthorizeError>() {
            return Some(auth);
        }
        current = e.source();
    }
    None
}

fn join_scopes(scopes: &[Scope]) -> String {
    scopes
        .iter()
        .map(Scope::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Make a value safe inside a quoted challenge parameter.
///
/// Quotes and backslashes become `'`; control characters become spaces so
/// the challenge is always a valid header value.
fn quote_safe(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            '"' | '\\' => '\'',
            c if c.is_control() => ' ',
            c => c,
        })
        .collect()
}

/// Result type alias for authorization checks.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
