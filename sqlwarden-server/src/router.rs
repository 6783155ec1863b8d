//! Router builder for sqlwarden HTTP endpoints.

use std::sync::Arc;

use axum::{
    middleware::map_response_with_state,
    routing::{get, post},
    Router,
};
use sqlwarden_auth::{
    ActionGroupMap, ProtectedResourceMetadata, RequireOptions, Scope, TokenValidator,
};

use crate::error::BuildError;
use crate::handler::{attach_resource_metadata, call_tool, list_tools, metadata_handler};
use crate::state::AppState;
use crate::tool::{ToolEntry, ToolHandler, ToolRegistry};

/// Builder for configuring sqlwarden HTTP endpoints.
///
/// The built router serves:
///
/// - `GET /tools` lists registered tools and whether the caller may use them.
/// - `POST /tools/:name` runs a tool after checking its action group.
/// - `GET /.well-known/oauth-protected-resource[/path]` when
///   [`metadata`](Self::metadata) is set.
///
/// # Example
///
/// ```rust,no_run
/// use sqlwarden_auth::{test_utils::StaticTokenValidator, ActionGroup, MetadataConfig};
/// use sqlwarden_server::{tool::tool_fn, WardenRouter};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let metadata = MetadataConfig::new("https://db.example.com")
///     .authorization_server("https://auth.example.com")
///     .build()?;
///
/// let app = WardenRouter::new(StaticTokenValidator::new())
///     .metadata(metadata)
///     .tool(
///         "pg_list_tables",
///         "List tables in the current database",
///         ActionGroup::Core,
///         tool_fn(|_ctx, _input| async move { Ok(serde_json::json!([])) }),
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct WardenRouter {
    validator: Arc<dyn TokenValidator>,
    groups: ActionGroupMap,
    metadata: Option<ProtectedResourceMetadata>,
    tools: Vec<ToolEntry>,
    require: RequireOptions,
}

impl WardenRouter {
    /// Create a new router builder with the given token validator.
    pub fn new<V>(validator: V) -> Self
    where
        V: TokenValidator + 'static,
    {
        Self::from_arc(Arc::new(validator))
    }

    /// Create a new router builder from a shared validator.
    ///
    /// Use this when the validator also serves other parts of your
    /// application, for example to share a key cache.
    pub fn from_arc(validator: Arc<dyn TokenValidator>) -> Self {
        Self {
            validator,
            groups: ActionGroupMap::default(),
            metadata: None,
            tools: Vec::new(),
            require: RequireOptions::default(),
        }
    }

    /// Replace the built-in group to tier table.
    pub fn action_groups(mut self, groups: ActionGroupMap) -> Self {
        self.groups = groups;
        self
    }

    /// Serve RFC 9728 metadata and reference it from every challenge.
    pub fn metadata(mut self, metadata: ProtectedResourceMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Register a tool gated by `group`.
    pub fn tool<H>(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        group: impl AsRef<str>,
        handler: H,
    ) -> Self
    where
        H: ToolHandler + 'static,
    {
        self.tools.push(ToolEntry {
            name: name.into(),
            description: description.into(),
            group: group.as_ref().to_string(),
            handler: Arc::new(handler),
        });
        self
    }

    /// Let requests without a credential reach handlers.
    ///
    /// Listing works anonymously; every tool call still needs a credential
    /// that covers the tool's group.
    pub fn optional_auth(mut self) -> Self {
        self.require.required = false;
        self
    }

    /// Require one of these scopes on every authenticated request, on top of
    /// the per-tool group check.
    pub fn require_any_of<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scope>,
    {
        self.require = self.require.with_permissions(scopes);
        self
    }

    /// Build the router with all configured endpoints.
    ///
    /// # Errors
    ///
    /// - [`BuildError::NoTools`] if no tool was registered.
    /// - [`BuildError::DuplicateTool`] if two tools share a name.
    pub fn build(self) -> Result<Router, BuildError> {
        let (tools, metadata) = self.assemble()?;
        Ok(match metadata {
            Some(metadata) => tools.merge(metadata),
            None => tools,
        })
    }

    /// Build the router and nest the tool routes under a prefix path.
    ///
    /// The metadata document stays at the path [`metadata_url`] names,
    /// outside the prefix, where RFC 9728 clients look for it.
    ///
    /// [`metadata_url`]: sqlwarden_auth::ProtectedResourceMetadata::metadata_url
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_nested(self, prefix: impl Into<String>) -> Result<Router, BuildError> {
        let (tools, metadata) = self.assemble()?;
        let router = Router::new().nest(&prefix.into(), tools);
        Ok(match metadata {
            Some(metadata) => router.merge(metadata),
            None => router,
        })
    }

    /// Tool routes and, if configured, the metadata route.
    fn assemble(self) -> Result<(Router, Option<Router>), BuildError> {
        if self.tools.is_empty() {
            return Err(BuildError::NoTools);
        }

        let mut registry = ToolRegistry::new();
        for entry in self.tools {
            if let Err(dup) = registry.insert(entry) {
                return Err(BuildError::DuplicateTool(dup.name));
            }
        }

        let metadata_path = self
            .metadata
            .as_ref()
            .map(|m| m.metadata_path().to_string());

        let state = AppState {
            validator: self.validator,
            groups: Arc::new(self.groups),
            metadata: self.metadata.map(Arc::new),
            tools: Arc::new(registry),
            require: self.require,
        };

        log::debug!(
            "built router with {} tools (credential {})",
            state.tools.len(),
            if state.require.required {
                "required"
            } else {
                "optional"
            }
        );

        let metadata = metadata_path.map(|path| {
            Router::new()
                .route(&path, get(metadata_handler))
                .with_state(state.clone())
        });

        let tools = Router::new()
            .route("/tools", get(list_tools))
            .route("/tools/:name", post(call_tool))
            .layer(map_response_with_state(
                state.clone(),
                attach_resource_metadata,
            ))
            .with_state(state);

        Ok((tools, metadata))
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
