//! Application state for the sqlwarden server.

use std::sync::Arc;

use sqlwarden_auth::{ActionGroupMap, ProtectedResourceMetadata, RequireOptions, TokenValidator};

use crate::tool::ToolRegistry;

/// Shared application state.
///
/// Cloned for each request. Everything behind an `Arc` is built once by
/// [`WardenRouter`](crate::WardenRouter) and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub validator: Arc<dyn TokenValidator>,
    pub groups: Arc<ActionGroupMap>,
    /// Advertised at the well-known path and referenced from challenges.
    pub metadata: Option<Arc<ProtectedResourceMetadata>>,
    pub tools: Arc<ToolRegistry>,
    pub require: RequireOptions,
}

impl AppState {
    /// URL to put in the `resource_metadata` challenge parameter, if any.
    pub fn metadata_url(&self) -> Option<&str> {
        self.metadata.as_deref().map(|m| m.metadata_url())
    }
}
