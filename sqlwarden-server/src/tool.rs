//! Named database actions and the registry that gates them.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlwarden_auth::AuthContext;

/// Errors a tool can return.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The input did not match what the tool expects. Rendered as 400.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The database rejected or failed the operation.
    #[error("database error: {0}")]
    Database(String),

    #[error("{0}")]
    Custom(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidInput(err.to_string())
    }
}

/// A database action exposed by the server.
///
/// Handlers receive the caller's [`AuthContext`] so they can make
/// resource-level checks (for example with
/// [`has_table_access`](sqlwarden_auth::has_table_access)) after the
/// group-level check has passed.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, ctx: AuthContext, input: Value) -> Result<Value, ToolError>;
}

/// Adapts an async closure into a [`ToolHandler`].
pub struct FnTool<F>(F);

#[async_trait]
impl<F, Fut> ToolHandler for FnTool<F>
where
    F: Fn(AuthContext, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn call(&self, ctx: AuthContext, input: Value) -> Result<Value, ToolError> {
        (self.0)(ctx, input).await
    }
}

/// Wrap an async closure as a tool handler.
///
/// ```rust
/// use sqlwarden_server::tool::{tool_fn, ToolHandler};
///
/// let echo = tool_fn(|_ctx, input| async move { Ok(input) });
/// # let _: &dyn ToolHandler = &echo;
/// ```
pub fn tool_fn<F, Fut>(f: F) -> FnTool<F>
where
    F: Fn(AuthContext, Value) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    FnTool(f)
}

/// One registered tool.
#[derive(Clone)]
pub struct ToolEntry {
    pub name: String,
    pub description: String,
    /// Action group whose minimum tier gates this tool.
    pub group: String,
    pub handler: Arc<dyn ToolHandler>,
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("name", &self.name)
            .field("group", &self.group)
            .finish_non_exhaustive()
    }
}

/// Tools keyed by name. Built once and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolEntry>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool. Returns the entry back if the name is taken.
    pub fn insert(&mut self, entry: ToolEntry) -> Result<(), ToolEntry> {
        if self.tools.contains_key(&entry.name) {
            return Err(entry);
        }
        self.tools.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.tools.get(name)
    }

    /// Tools in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlwarden_auth::Claims;

    fn entry(name: &str, group: &str) -> ToolEntry {
        ToolEntry {
            name: name.to_string(),
            description: format!("{} tool", name),
            group: group.to_string(),
            handler: Arc::new(tool_fn(|_ctx, input| async move { Ok(input) })),
        }
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        assert!(registry.insert(entry("pg_read_query", "core")).is_ok());

        let dup = registry.insert(entry("pg_read_query", "admin")).unwrap_err();
        assert_eq!(dup.group, "admin");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("pg_read_query").unwrap().group, "core");
    }

    #[test]
    fn test_registry_iterates_in_name_order() {
        let mut registry = ToolRegistry::new();
        registry.insert(entry("pg_vacuum", "admin")).unwrap();
        registry.insert(entry("pg_begin", "transactions")).unwrap();
        registry.insert(entry("pg_list_tables", "core")).unwrap();

        let names: Vec<&str> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["pg_begin", "pg_list_tables", "pg_vacuum"]);
        assert!(!registry.is_empty());
    }

    #[tokio::test]
    async fn test_fn_tool_receives_context_and_input() {
        let whoami = tool_fn(|ctx: AuthContext, input: Value| async move {
            Ok(json!({
                "subject": ctx.subject(),
                "input": input,
            }))
        });
        let ctx = AuthContext::authenticated(Claims::new("alice", ["read"]));

        let out = whoami.call(ctx, json!({"q": 1})).await.unwrap();
        assert_eq!(out, json!({"subject": "alice", "input": {"q": 1}}));
    }

    #[test]
    fn test_tool_error_from_serde() {
        let err = serde_json::from_str::<Value>("{").unwrap_err();
        assert!(matches!(ToolError::from(err), ToolError::InvalidInput(_)));
    }

    #[test]
    fn test_tool_entry_debug_omits_handler() {
        let debug = format!("{:?}", entry("pg_read_query", "core"));
        assert!(debug.contains("pg_read_query"));
        assert!(debug.contains("core"));
    }
}
