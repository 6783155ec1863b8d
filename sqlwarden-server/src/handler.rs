//! HTTP handlers and the bearer-token extractor.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, State},
    http::{
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
        request::Parts,
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use sqlwarden_auth::{require_group, validate_and_require, AuthContext, AuthError};

use crate::error::{challenge_header, ServerError, ServerResult};
use crate::state::AppState;

/// The caller's authorization context.
///
/// Runs [`validate_and_require`] with the router's
/// [`RequireOptions`](sqlwarden_auth::RequireOptions). A header that is not
/// valid UTF-8 is treated as absent.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let ctx = validate_and_require(header, state.validator.as_ref(), &state.require).await?;
        Ok(Authenticated(ctx))
    }
}

/// One row of the tool listing.
#[derive(Debug, Serialize)]
pub struct ToolSummary<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub group: &'a str,
    pub required_scope: &'static str,
    /// Whether the caller could invoke this tool right now.
    pub allowed: bool,
}

/// `GET` the RFC 9728 metadata document.
pub async fn metadata_handler(State(state): State<AppState>) -> Response {
    match state.metadata.as_deref() {
        Some(metadata) => Json(metadata).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `GET /tools`: every registered tool, in name order.
pub async fn list_tools(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
) -> Response {
    let tools: Vec<ToolSummary<'_>> = state
        .tools
        .iter()
        .map(|entry| ToolSummary {
            name: &entry.name,
            description: &entry.description,
            group: &entry.group,
            required_scope: state.groups.required_tier_for(&entry.group).as_str(),
            allowed: require_group(&ctx, &state.groups, &entry.group).is_ok(),
        })
        .collect();
    Json(tools).into_response()
}

/// `POST /tools/:name`: run a tool if the caller's scopes cover its group.
///
/// An empty body is passed to the tool as `{}`.
pub async fn call_tool(
    State(state): State<AppState>,
    Authenticated(ctx): Authenticated,
    Path(name): Path<String>,
    body: Bytes,
) -> ServerResult<Json<Value>> {
    let entry = state
        .tools
        .get(&name)
        .ok_or_else(|| ServerError::ToolNotFound(name.clone()))?;

    require_group(&ctx, &state.groups, &entry.group)?;

    let input = if body.is_empty() {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&body).map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    };

    log::info!(
        "subject '{}' calling tool '{}' (group '{}')",
        ctx.subject().unwrap_or("anonymous"),
        entry.name,
        entry.group
    );
    let result = entry.handler.call(ctx, input).await?;

    Ok(Json(json!({
        "tool": entry.name,
        "result": result,
    })))
}

/// Add `resource_metadata` to challenges produced by [`ServerError::Auth`].
pub async fn attach_resource_metadata(
    State(state): State<AppState>,
    mut response: Response,
) -> Response {
    let Some(url) = state.metadata_url() else {
        return response;
    };
    let challenge = response
        .extensions()
        .get::<AuthError>()
        .map(|err| challenge_header(err, Some(url)));

    if let Some(value) = challenge {
        response.headers_mut().insert(WWW_AUTHENTICATE, value);
    }
    response
}
