//! Configuration for the protected resource metadata document.
//!
//! The document is static per process. Build it once from a
//! [`MetadataConfig`] at startup:
//!
//! ```rust
//! use sqlwarden_auth::MetadataConfig;
//!
//! let metadata = MetadataConfig::new("https://db-tools.example.com/mcp")
//!     .authorization_server("https://auth.example.com")
//!     .documentation("https://db-tools.example.com/docs")
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     metadata.metadata_url(),
//!     "https://db-tools.example.com/.well-known/oauth-protected-resource/mcp"
//! );
//! ```

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::metadata::{metadata_url_for, ProtectedResourceMetadata};
use crate::scope::{Scope, StandardTier};

/// Bearer presentation methods defined by RFC 6750.
pub const BEARER_METHODS: [&str; 3] = ["header", "body", "query"];

/// Errors that can occur when building the metadata document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A field that must be an absolute http(s) URI is not one.
    #[error("invalid {field} URI '{value}': {message}")]
    InvalidUri {
        field: &'static str,
        value: String,
        message: String,
    },

    /// At least one bearer presentation method is needed.
    #[error("bearer_methods_supported must not be empty")]
    EmptyBearerMethods,

    #[error("unsupported bearer method '{0}' (expected header, body or query)")]
    UnsupportedBearerMethod(String),

    /// A supported scope is neither a standard tier nor a resource pattern.
    #[error("unsupported scope '{0}'")]
    InvalidScope(String),
}

/// Inputs for [`ProtectedResourceMetadata`].
///
/// Deserializable so deployments can keep it in a config file; every field
/// except `resource` has a default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MetadataConfig {
    /// Identifier of this resource server.
    pub resource: String,

    /// Issuers trusted to mint credentials for this resource.
    #[serde(default)]
    pub authorization_servers: Vec<String>,

    #[serde(default = "default_scopes")]
    pub scopes_supported: Vec<String>,

    #[serde(default = "default_bearer_methods")]
    pub bearer_methods_supported: Vec<String>,

    #[serde(default)]
    pub resource_documentation: Option<String>,

    #[serde(default = "default_signing_algorithms")]
    pub signing_algorithms: Vec<String>,
}

impl MetadataConfig {
    /// Start a config with defaults: the four tiers, header-only bearer
    /// presentation, RS256 and ES256 signing.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            authorization_servers: Vec::new(),
            scopes_supported: default_scopes(),
            bearer_methods_supported: default_bearer_methods(),
            resource_documentation: None,
            signing_algorithms: default_signing_algorithms(),
        }
    }

    pub fn authorization_server(mut self, issuer: impl Into<String>) -> Self {
        self.authorization_servers.push(issuer.into());
        self
    }

    /// Advertise an additional scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scopes_supported.push(scope.into());
        self
    }

    pub fn bearer_methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bearer_methods_supported = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn documentation(mut self, uri: impl Into<String>) -> Self {
        self.resource_documentation = Some(uri.into());
        self
    }

    pub fn signing_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signing_algorithms = algorithms.into_iter().map(Into::into).collect();
        self
    }

    /// Check every field without building.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_http_uri("resource", &self.resource)?;
        for issuer in &self.authorization_servers {
            parse_http_uri("authorization_server", issuer)?;
        }
        if let Some(doc) = &self.resource_documentation {
            parse_http_uri("resource_documentation", doc)?;
        }
        if self.bearer_methods_supported.is_empty() {
            return Err(ConfigError::EmptyBearerMethods);
        }
        if let Some(method) = self
            .bearer_methods_supported
            .iter()
            .find(|m| !BEARER_METHODS.contains(&m.as_str()))
        {
            return Err(ConfigError::UnsupportedBearerMethod(method.clone()));
        }
        if let Some(scope) = self
            .scopes_supported
            .iter()
            .find(|s| matches!(Scope::parse(s), Scope::Other(_)))
        {
            return Err(ConfigError::InvalidScope(scope.clone()));
        }
        Ok(())
    }

    /// Validate and build the metadata document.
    pub fn build(self) -> Result<ProtectedResourceMetadata, ConfigError> {
        self.validate()?;
        let resource_url = parse_http_uri("resource", &self.resource)?;
        let metadata_url = metadata_url_for(&resource_url);

        let mut scopes_supported = Vec::with_capacity(self.scopes_supported.len());
        for scope in self.scopes_supported {
            if !scopes_supported.contains(&scope) {
                scopes_supported.push(scope);
            }
        }

        Ok(ProtectedResourceMetadata {
            resource: self.resource,
            authorization_servers: self.authorization_servers,
            scopes_supported,
            bearer_methods_supported: self.bearer_methods_supported,
            resource_documentation: self.resource_documentation,
            resource_signing_alg_values_supported: self.signing_algorithms,
            metadata_url,
        })
    }
}

fn default_scopes() -> Vec<String> {
    StandardTier::ALL
        .iter()
        .map(|tier| tier.as_str().to_string())
        .collect()
}

fn default_bearer_methods() -> Vec<String> {
    vec!["header".to_string()]
}

fn default_signing_algorithms() -> Vec<String> {
    vec!["RS256".to_string(), "ES256".to_string()]
}

fn parse_http_uri(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidUri {
        field,
        value: value.to_string(),
        message,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("scheme '{}' is not http(s)", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MetadataConfig::new("https://db.example.com");
        assert_eq!(config.scopes_supported, vec!["read", "write", "admin", "full"]);
        assert_eq!(config.bearer_methods_supported, vec!["header"]);
        assert_eq!(config.signing_algorithms, vec!["RS256", "ES256"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: MetadataConfig =
            serde_json::from_str(r#"{"resource":"https://db.example.com"}"#).unwrap();
        assert_eq!(config, MetadataConfig::new("https://db.example.com"));
    }

    #[test]
    fn test_invalid_resource_uri() {
        let err = MetadataConfig::new("not a uri").build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUri { field: "resource", .. }));

        let err = MetadataConfig::new("ftp://db.example.com").build().unwrap_err();
        assert!(err.to_string().contains("not http(s)"));
    }

    #[test]
    fn test_invalid_authorization_server() {
        let err = MetadataConfig::new("https://db.example.com")
            .authorization_server("auth.example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidUri {
                field: "authorization_server",
                ..
            }
        ));
    }

    #[test]
    fn test_bearer_methods_validation() {
        let err = MetadataConfig::new("https://db.example.com")
            .bearer_methods(Vec::<String>::new())
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyBearerMethods);

        let err = MetadataConfig::new("https://db.example.com")
            .bearer_methods(["header", "cookie"])
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedBearerMethod("cookie".into()));
    }

    #[test]
    fn test_scope_validation() {
        assert!(MetadataConfig::new("https://db.example.com")
            .scope("db:analytics")
            .validate()
            .is_ok());

        let err = MetadataConfig::new("https://db.example.com")
            .scope("superuser")
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidScope("superuser".into()));
    }

    #[test]
    fn test_build_deduplicates_scopes() {
        let metadata = MetadataConfig::new("https://db.example.com")
            .scope("read")
            .scope("db:analytics")
            .build()
            .unwrap();
        assert_eq!(
            metadata.scopes_supported,
            vec!["read", "write", "admin", "full", "db:analytics"]
        );
    }
}
