//! Scope hierarchy resolution.
//!
//! Decides whether a granted scope set satisfies a requirement. The tier
//! rules are exhaustive:
//!
//! | Granted | Satisfies |
//! |---------|-----------|
//! | `full` | everything |
//! | `admin` | `admin`, `write`, `read` |
//! | `write` | `write`, `read` |
//! | `read` | `read` |
//!
//! Resource patterns only match themselves under [`satisfies`].
//! [`satisfies_resource`] additionally treats `admin` and `full` as owning
//! every resource, and lets a `schema:S` grant cover every table in `S`.

use crate::scope::{ResourceTarget, Scope, StandardTier};

const FULL: Scope = Scope::Standard(StandardTier::Full);
const ADMIN: Scope = Scope::Standard(StandardTier::Admin);
const WRITE: Scope = Scope::Standard(StandardTier::Write);

/// Check if `granted` satisfies a single required scope.
pub fn satisfies(granted: &[Scope], required: &Scope) -> bool {
    if granted.contains(&FULL) {
        return true;
    }
    if granted.contains(required) {
        return true;
    }
    match required {
        Scope::Standard(StandardTier::Read | StandardTier::Write) if granted.contains(&ADMIN) => {
            true
        }
        Scope::Standard(StandardTier::Read) => granted.contains(&WRITE),
        _ => false,
    }
}

/// True if at least one of `required` is satisfied. False for an empty list.
pub fn satisfies_any(granted: &[Scope], required: &[Scope]) -> bool {
    required.iter().any(|scope| satisfies(granted, scope))
}

/// True if every one of `required` is satisfied. True for an empty list.
pub fn satisfies_all(granted: &[Scope], required: &[Scope]) -> bool {
    required.iter().all(|scope| satisfies(granted, scope))
}

/// Check access to a database, schema or table.
pub fn satisfies_resource(granted: &[Scope], target: &ResourceTarget) -> bool {
    if granted.contains(&FULL) || granted.contains(&ADMIN) {
        return true;
    }
    granted.iter().any(|scope| match (scope, target) {
        (Scope::Database(have), ResourceTarget::Database(want)) => have == want,
        (Scope::Schema(have), ResourceTarget::Schema(want)) => have == want,
        (Scope::Schema(have), ResourceTarget::Table { schema, .. }) => have == schema,
        (
            Scope::Table { schema, table },
            ResourceTarget::Table {
                schema: want_schema,
                table: want_table,
            },
        ) => schema == want_schema && table == want_table,
        _ => false,
    })
}

pub fn has_database_access(granted: &[Scope], database: &str) -> bool {
    satisfies_resource(granted, &ResourceTarget::database(database))
}

pub fn has_schema_access(granted: &[Scope], schema: &str) -> bool {
    satisfies_resource(granted, &ResourceTarget::schema(schema))
}

pub fn has_table_access(granted: &[Scope], schema: &str, table: &str) -> bool {
    satisfies_resource(granted, &ResourceTarget::table(schema, table))
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
