//! Action groups and their minimum tiers.
//!
//! Every database action the server exposes belongs to one logical group.
//! An [`ActionGroupMap`] translates "this group was invoked" into "this tier
//! (or higher) is required". Lookups never consult a request's
//! authorization context.
//!
//! # Example
//!
//! ```rust
//! use sqlwarden_auth::{ActionGroupMap, StandardTier};
//!
//! let map = ActionGroupMap::default();
//! assert_eq!(map.required_tier_for("transactions"), StandardTier::Write);
//! assert_eq!(map.required_tier_for("backup"), StandardTier::Admin);
//!
//! // Unknown groups fall back to the read floor.
//! assert_eq!(map.required_tier_for("not-a-group"), StandardTier::Read);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scope::StandardTier;

/// A logical group of database actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionGroup {
    Core,
    Transactions,
    Jsonb,
    Text,
    Performance,
    Admin,
    Monitoring,
    Backup,
    Schema,
    Vector,
    Postgis,
    Partitioning,
    Stats,
    Cron,
    Partman,
    Kcache,
    Citext,
    Ltree,
    Pgcrypto,
    Codemode,
}

impl ActionGroup {
    pub const ALL: [ActionGroup; 20] = [
        ActionGroup::Core,
        ActionGroup::Transactions,
        ActionGroup::Jsonb,
        ActionGroup::Text,
        ActionGroup::Performance,
        ActionGroup::Admin,
        ActionGroup::Monitoring,
        ActionGroup::Backup,
        ActionGroup::Schema,
        ActionGroup::Vector,
        ActionGroup::Postgis,
        ActionGroup::Partitioning,
        ActionGroup::Stats,
        ActionGroup::Cron,
        ActionGroup::Partman,
        ActionGroup::Kcache,
        ActionGroup::Citext,
        ActionGroup::Ltree,
        ActionGroup::Pgcrypto,
        ActionGroup::Codemode,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Transactions => "transactions",
            Self::Jsonb => "jsonb",
            Self::Text => "text",
            Self::Performance => "performance",
            Self::Admin => "admin",
            Self::Monitoring => "monitoring",
            Self::Backup => "backup",
            Self::Schema => "schema",
            Self::Vector => "vector",
            Self::Postgis => "postgis",
            Self::Partitioning => "partitioning",
            Self::Stats => "stats",
            Self::Cron => "cron",
            Self::Partman => "partman",
            Self::Kcache => "kcache",
            Self::Citext => "citext",
            Self::Ltree => "ltree",
            Self::Pgcrypto => "pgcrypto",
            Self::Codemode => "codemode",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == name)
    }

    /// The built-in minimum tier for this group.
    pub const fn default_tier(&self) -> StandardTier {
        match self {
            Self::Transactions => StandardTier::Write,
            Self::Admin
            | Self::Backup
            | Self::Partitioning
            | Self::Cron
            | Self::Partman
            | Self::Codemode => StandardTier::Admin,
            Self::Core
            | Self::Jsonb
            | Self::Text
            | Self::Performance
            | Self::Monitoring
            | Self::Schema
            | Self::Vector
            | Self::Postgis
            | Self::Stats
            | Self::Kcache
            | Self::Citext
            | Self::Ltree
            | Self::Pgcrypto => StandardTier::Read,
        }
    }
}

impl std::fmt::Display for ActionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for ActionGroup {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Immutable group → minimum tier table.
///
/// Build it once at startup and share it by reference (or `Arc`). There is
/// no way to change a built map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGroupMap {
    tiers: HashMap<String, StandardTier>,
}

impl ActionGroupMap {
    /// Start from the built-in table and apply deployment overrides.
    pub fn builder() -> ActionGroupMapBuilder {
        ActionGroupMapBuilder {
            tiers: Self::default().tiers,
        }
    }

    /// Minimum tier for a group. Groups not in the table require `read`.
    pub fn required_tier_for(&self, group: &str) -> StandardTier {
        self.tiers.get(group).copied().unwrap_or(StandardTier::Read)
    }

    pub fn contains(&self, group: &str) -> bool {
        self.tiers.contains_key(group)
    }

    /// Iterate `(group, tier)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, StandardTier)> {
        self.tiers.iter().map(|(group, tier)| (group.as_str(), *tier))
    }
}

impl Default for ActionGroupMap {
    fn default() -> Self {
        Self {
            tiers: ActionGroup::ALL
                .into_iter()
                .map(|group| (group.as_str().to_string(), group.default_tier()))
                .collect(),
        }
    }
}

/// Builder for [`ActionGroupMap`].
#[derive(Debug, Clone)]
pub struct ActionGroupMapBuilder {
    tiers: HashMap<String, StandardTier>,
}

impl ActionGroupMapBuilder {
    /// Set the tier for a group, adding the group if it is new.
    pub fn with_override(mut self, group: impl Into<String>, tier: StandardTier) -> Self {
        self.tiers.insert(group.into(), tier);
        self
    }

    pub fn build(self) -> ActionGroupMap {
        ActionGroupMap { tiers: self.tiers }
    }
}
