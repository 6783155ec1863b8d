//! Scope vocabulary.
//!
//! A scope is a string token granted to a caller. Two shapes exist:
//!
//! | Shape | Wire form | Example |
//! |-------|-----------|---------|
//! | Standard tier | `read`, `write`, `admin`, `full` | `write` |
//! | Database pattern | `db:<database>` | `db:analytics` |
//! | Schema pattern | `schema:<schema>` | `schema:public` |
//! | Table pattern | `table:<schema>:<table>` | `table:public:users` |
//!
//! Raw claim strings are parsed once into [`Scope`] values at the boundary
//! where they are first read. The rest of the crate only sees the parsed form.

use serde::{Deserialize, Serialize};

const DATABASE_PREFIX: &str = "db:";
const SCHEMA_PREFIX: &str = "schema:";
const TABLE_PREFIX: &str = "table:";

/// One of the four standard permission tiers.
///
/// Tiers are ordered by subsumption: `full ⊇ admin ⊇ write ⊇ read`. The
/// order is fixed here and cannot be changed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardTier {
    /// Query and inspect.
    Read,
    /// Modify data.
    Write,
    /// Administrative operations on the server.
    Admin,
    /// Everything, including every resource pattern.
    Full,
}

impl StandardTier {
    /// All tiers, lowest first.
    pub const ALL: [StandardTier; 4] = [
        StandardTier::Read,
        StandardTier::Write,
        StandardTier::Admin,
        StandardTier::Full,
    ];

    /// Parse an exact wire token. Case-sensitive.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "read" => Some(Self::Read),
            "write" => Some(Self::Write),
            "admin" => Some(Self::Admin),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// The wire token for this tier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
            Self::Full => "full",
        }
    }

    /// Human-readable name, used in discovery documents and tool listings.
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Read => "Read Only",
            Self::Write => "Read/Write",
            Self::Admin => "Administrative",
            Self::Full => "Full Access",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Read => "Run read-only queries and inspect schemas, statistics and health",
            Self::Write => "Modify data and manage transactions",
            Self::Admin => "Maintenance, backups, partitioning, scheduling and extensions",
            Self::Full => "Unrestricted access to every operation and resource",
        }
    }
}

impl std::fmt::Display for StandardTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed permission token.
///
/// Anything that is neither a tier nor a well-formed resource pattern is
/// kept as [`Scope::Other`] so it can still be matched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Standard(StandardTier),
    Database(String),
    Schema(String),
    Table { schema: String, table: String },
    Other(String),
}

impl Scope {
    /// Parse a single wire token. Never fails.
    pub fn parse(token: &str) -> Self {
        if let Some(tier) = StandardTier::parse(token) {
            return Scope::Standard(tier);
        }
        if let Some(name) = token.strip_prefix(DATABASE_PREFIX) {
            if is_segment(name) {
                return Scope::Database(name.to_string());
            }
        } else if let Some(name) = token.strip_prefix(SCHEMA_PREFIX) {
            if is_segment(name) {
                return Scope::Schema(name.to_string());
            }
        } else if let Some(rest) = token.strip_prefix(TABLE_PREFIX) {
            if let Some((schema, table)) = rest.split_once(':') {
                if is_segment(schema) && is_segment(table) {
                    return Scope::Table {
                        schema: schema.to_string(),
                        table: table.to_string(),
                    };
                }
            }
        }
        Scope::Other(token.to_string())
    }

    /// Render the wire token.
    pub fn as_wire(&self) -> String {
        self.to_string()
    }

    /// The tier, if this is a standard tier scope.
    pub fn tier(&self) -> Option<StandardTier> {
        match self {
            Scope::Standard(tier) => Some(*tier),
            _ => None,
        }
    }

    /// Check if this is a well-formed resource pattern.
    pub fn is_pattern(&self) -> bool {
        matches!(
            self,
            Scope::Database(_) | Scope::Schema(_) | Scope::Table { .. }
        )
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Standard(tier) => f.write_str(tier.as_str()),
            Scope::Database(name) => write!(f, "{}{}", DATABASE_PREFIX, name),
            Scope::Schema(name) => write!(f, "{}{}", SCHEMA_PREFIX, name),
            Scope::Table { schema, table } => write!(f, "{}{}:{}", TABLE_PREFIX, schema, table),
            Scope::Other(raw) => f.write_str(raw),
        }
    }
}

impl From<StandardTier> for Scope {
    fn from(tier: StandardTier) -> Self {
        Scope::Standard(tier)
    }
}

impl From<&str> for Scope {
    fn from(token: &str) -> Self {
        Scope::parse(token)
    }
}

impl Serialize for Scope {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Scope {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Scope::parse(&raw))
    }
}

/// The resource a pattern check asks about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceTarget {
    Database(String),
    Schema(String),
    Table { schema: String, table: String },
}

impl ResourceTarget {
    pub fn database(name: impl Into<String>) -> Self {
        Self::Database(name.into())
    }

    pub fn schema(name: impl Into<String>) -> Self {
        Self::Schema(name.into())
    }

    pub fn table(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self::Table {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// The scope that grants exactly this resource.
    pub fn exact_scope(&self) -> Scope {
        match self {
            ResourceTarget::Database(name) => Scope::Database(name.clone()),
            ResourceTarget::Schema(name) => Scope::Schema(name.clone()),
            ResourceTarget::Table { schema, table } => Scope::Table {
                schema: schema.clone(),
                table: table.clone(),
            },
        }
    }
}

/// Build a `db:<name>` scope string.
pub fn database_scope(name: &str) -> String {
    format!("{}{}", DATABASE_PREFIX, name)
}

/// Build a `schema:<name>` scope string.
pub fn schema_scope(name: &str) -> String {
    format!("{}{}", SCHEMA_PREFIX, name)
}

/// Build a `table:<schema>:<table>` scope string.
pub fn table_scope(schema: &str, table: &str) -> String {
    format!("{}{}:{}", TABLE_PREFIX, schema, table)
}

/// Split a space-delimited scope claim into tokens.
///
/// Runs of whitespace collapse and empty tokens are dropped, so a missing or
/// blank claim yields an empty list.
pub fn parse_scopes(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Check if a string is a syntactically valid resource pattern.
pub fn is_pattern_scope(token: &str) -> bool {
    Scope::parse(token).is_pattern()
}

fn is_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(':') && !s.chars().any(char::is_whitespace)
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
