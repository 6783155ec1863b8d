//! Bearer-token scope authorization for database tool servers.
//!
//! A tool server exposes database operations behind named actions. This
//! crate decides whether a caller may invoke one: it extracts a bearer
//! credential, hands it to an injected [`TokenValidator`], turns the claims
//! into a structured scope set and checks that set against what the action
//! requires.
//!
//! # Overview
//!
//! - **[`Scope`]**: Standard tiers (`read`, `write`, `admin`, `full`) and
//!   resource patterns (`db:`, `schema:`, `table:`)
//! - **[`resolver`]**: Tier subsumption and pattern inheritance rules
//! - **[`ActionGroupMap`]**: Minimum tier per action group
//! - **[`AuthContext`]**: Immutable per-request result of authentication
//! - **[`validate_and_require`]** and the `require_*` functions: checks used
//!   by request handlers
//! - **[`AuthError`]** and [`render_error`]: Failure kinds and their HTTP
//!   representation
//! - **[`ProtectedResourceMetadata`]**: RFC 9728 discovery document
//!
//! # Example
//!
//! ```rust
//! use sqlwarden_auth::{
//!     render_error, require_group, ActionGroupMap, AuthContext, Claims,
//! };
//!
//! let groups = ActionGroupMap::default();
//! let ctx = AuthContext::authenticated(Claims::new("reader", ["read"]));
//!
//! // Read-only callers may run core queries...
//! assert!(require_group(&ctx, &groups, "core").is_ok());
//!
//! // ...but not open transactions.
//! let err = require_group(&ctx, &groups, "transactions").unwrap_err();
//! let response = render_error(&err);
//! assert_eq!(response.status.as_u16(), 403);
//! assert_eq!(response.body.scope.as_deref(), Some("write"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod groups;
pub mod metadata;
pub mod middleware;
pub mod resolver;
pub mod scope;
pub mod validator;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{ConfigError, MetadataConfig};
pub use context::{build_context, extract_bearer_token, AuthContext};
pub use error::{render_error, AuthError, AuthResult, AuthorizeError, ErrorBody, ErrorResponse};
pub use groups::{ActionGroup, ActionGroupMap, ActionGroupMapBuilder};
pub use metadata::{ProtectedResourceMetadata, WELL_KNOWN_PATH};
pub use middleware::{
    authenticate, require_action_group_permission, require_any_permission, require_group,
    require_permission, validate_and_require, RequireOptions,
};
pub use resolver::{
    has_database_access, has_schema_access, has_table_access, satisfies, satisfies_all,
    satisfies_any, satisfies_resource,
};
pub use scope::{
    database_scope, is_pattern_scope, parse_scopes, schema_scope, table_scope, ResourceTarget,
    Scope, StandardTier,
};
pub use validator::{Claims, TokenValidation, TokenValidator, ValidatorError};
