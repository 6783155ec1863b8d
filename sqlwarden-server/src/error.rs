//! Error types for the sqlwarden server.
//!
//! [`ServerError`] is the single place where failures become HTTP
//! responses. Authorization and unclassified failures go through
//! [`render_error`]; routing failures keep their own 404/400 shapes.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlwarden_auth::{render_error, AuthError, AuthorizeError, ErrorBody, ValidatorError};

use crate::tool::ToolError;

/// Errors that can occur when building a router.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// No tools were registered.
    #[error("No tools registered. Call .tool() before .build()")]
    NoTools,

    /// Two tools share a name.
    #[error("Tool '{0}' is registered more than once")]
    DuplicateTool(String),
}

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Missing, invalid or insufficient credentials.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// The token validator failed. Rendered as an opaque 500.
    #[error("{0}")]
    Validator(#[from] ValidatorError),

    /// No tool with this name.
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Malformed request from the client.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The tool itself failed.
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

impl From<AuthorizeError> for ServerError {
    fn from(err: AuthorizeError) -> Self {
        match err {
            AuthorizeError::Auth(e) => ServerError::Auth(e),
            AuthorizeError::Validator(e) => ServerError::Validator(e),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ServerError::ToolNotFound(name) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "tool_not_found",
                    error_description: format!("No tool named '{}'", name),
                    scope: None,
                },
            ),
            ServerError::InvalidRequest(message)
            | ServerError::Tool(ToolError::InvalidInput(message)) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: "invalid_request",
                    error_description: message.clone(),
                    scope: None,
                },
            ),
            ServerError::Auth(e) => {
                let rendered = render_error(e);
                (rendered.status, rendered.body)
            }
            ServerError::Validator(e) => {
                log::error!("token validator failed: {}", e);
                let rendered = render_error(&self);
                (rendered.status, rendered.body)
            }
            ServerError::Tool(e) => {
                log::error!("tool failed: {}", e);
                let rendered = render_error(&self);
                (rendered.status, rendered.body)
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let ServerError::Auth(e) = self {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, challenge_header(&e, None));
            // Picked up by the router to add `resource_metadata` to the challenge.
            response.extensions_mut().insert(e);
        }
        response
    }
}

/// The `WWW-Authenticate` value for an auth error.
///
/// Falls back to a challenge carrying only the error code if the full one is
/// not a valid header value, so a 401 or 403 never goes out without one.
pub(crate) fn challenge_header(err: &AuthError, resource_metadata: Option<&str>) -> HeaderValue {
    HeaderValue::from_str(&err.www_authenticate(resource_metadata)).unwrap_or_else(|_| {
        log::warn!("challenge for '{}' is not a valid header value", err.code());
        HeaderValue::from_static(match err {
            AuthError::CredentialMissing(_) => "Bearer",
            AuthError::CredentialInvalid(_) => "Bearer error=\"invalid_token\"",
            AuthError::InsufficientPermission { .. } => "Bearer error=\"insufficient_scope\"",
        })
    })
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
