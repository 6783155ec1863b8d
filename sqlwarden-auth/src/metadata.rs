//! OAuth 2.0 Protected Resource Metadata (RFC 9728).
//!
//! Clients that receive a 401 fetch this document from
//! [`WELL_KNOWN_PATH`] to discover which authorization servers issue
//! credentials for this server and which scopes it understands.

use serde::Serialize;
use url::Url;

use crate::config::MetadataConfig;
use crate::scope::is_pattern_scope;

/// Path the metadata document is served at.
pub const WELL_KNOWN_PATH: &str = "/.well-known/oauth-protected-resource";

/// The discovery document. Build it with
/// [`MetadataConfig`](crate::MetadataConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtectedResourceMetadata {
    pub resource: String,

    pub authorization_servers: Vec<String>,

    pub scopes_supported: Vec<String>,

    pub bearer_methods_supported: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_documentation: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource_signing_alg_values_supported: Vec<String>,

    #[serde(skip)]
    pub(crate) metadata_url: String,
}

impl ProtectedResourceMetadata {
    /// Start configuring metadata for `resource`.
    pub fn builder(resource: impl Into<String>) -> MetadataConfig {
        MetadataConfig::new(resource)
    }

    /// Check if a scope is understood by this server.
    ///
    /// Resource patterns (`db:`, `schema:`, `table:S:T`) are valid without
    /// being listed, since they cannot be enumerated up front.
    pub fn is_scope_supported(&self, scope: &str) -> bool {
        self.scopes_supported.iter().any(|s| s == scope) || is_pattern_scope(scope)
    }

    /// Absolute URL of this document, for `WWW-Authenticate` challenges.
    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    /// Path component of [`metadata_url`](Self::metadata_url), for routing.
    pub fn metadata_path(&self) -> &str {
        self.metadata_url
            .find(WELL_KNOWN_PATH)
            .map_or(WELL_KNOWN_PATH, |start| &self.metadata_url[start..])
    }
}

/// Insert the well-known path between the authority and the resource path,
/// as RFC 9728 §3.1 describes.
pub(crate) fn metadata_url_for(resource: &Url) -> String {
    let path = resource.path().trim_end_matches('/');
    format!(
        "{}{}{}",
        resource.origin().ascii_serialization(),
        WELL_KNOWN_PATH,
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ProtectedResourceMetadata {
        MetadataConfig::new("https://db.example.com")
            .authorization_server("https://auth.example.com")
            .documentation("https://db.example.com/docs")
            .build()
            .unwrap()
    }

    #[test]
    fn test_serializes_rfc9728_fields() {
        let json = serde_json::to_value(metadata()).unwrap();
        assert_eq!(json["resource"], "https://db.example.com");
        assert_eq!(json["authorization_servers"][0], "https://auth.example.com");
        assert_eq!(
            json["scopes_supported"],
            serde_json::json!(["read", "write", "admin", "full"])
        );
        assert_eq!(json["bearer_methods_supported"], serde_json::json!(["header"]));
        assert_eq!(json["resource_documentation"], "https://db.example.com/docs");
        assert_eq!(
            json["resource_signing_alg_values_supported"],
            serde_json::json!(["RS256", "ES256"])
        );
        assert!(json.get("metadata_url").is_none());
    }

    #[test]
    fn test_builder_starts_from_defaults() {
        let metadata = ProtectedResourceMetadata::builder("https://db.example.com")
            .build()
            .unwrap();
        assert!(metadata.authorization_servers.is_empty());
        assert_eq!(metadata.bearer_methods_supported, vec!["header"]);
        assert_eq!(metadata.resource_documentation, None);
    }

    #[test]
    fn test_is_scope_supported_listed_tiers() {
        let metadata = metadata();
        for tier in ["read", "write", "admin", "full"] {
            assert!(metadata.is_scope_supported(tier));
        }
        assert!(!metadata.is_scope_supported("superuser"));
    }

    #[test]
    fn test_is_scope_supported_patterns() {
        let metadata = metadata();
        assert!(metadata.is_scope_supported("db:analytics"));
        assert!(metadata.is_scope_supported("schema:public"));
        assert!(metadata.is_scope_supported("table:public:users"));
        assert!(!metadata.is_scope_supported("table:public"));
        assert!(!metadata.is_scope_supported("db:"));
    }

    #[test]
    fn test_metadata_url_for_root_resource() {
        assert_eq!(
            metadata().metadata_url(),
            "https://db.example.com/.well-known/oauth-protected-resource"
        );
        assert_eq!(metadata().metadata_path(), WELL_KNOWN_PATH);
    }

    #[test]
    fn test_metadata_url_keeps_resource_path_and_port() {
        let metadata = MetadataConfig::new("http://localhost:8080/mcp/")
            .build()
            .unwrap();
        assert_eq!(
            metadata.metadata_url(),
            "http://localhost:8080/.well-known/oauth-protected-resource/mcp"
        );
        assert_eq!(
            metadata.metadata_path(),
            "/.well-known/oauth-protected-resource/mcp"
        );
    }
}
