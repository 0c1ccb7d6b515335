//! Resource pattern parsing and statement matching
//!
//! Resource strings have exactly three `::`-separated segments:
//! `prefix::resource::scope`. The scope segment is a comma-separated list of
//! target-instance keys; an empty scope means the statement is not
//! restricted to particular instances.

use crate::error::{AclError, Result};
use crate::policy::Statement;

/// A parsed `prefix::resource::scope` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePattern {
    pub prefix: String,
    pub resource: String,
    pub scope: Vec<String>,
}

impl ResourcePattern {
    /// Parse a raw resource string. The segment count is the only check
    /// made here; prefix and catalog checks belong to the validator.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split("::").collect();
        let [prefix, resource, scope] = parts.as_slice() else {
            return Err(AclError::MalformedResource(raw.to_string()));
        };

        let scope = if scope.is_empty() {
            Vec::new()
        } else {
            scope.split(',').map(str::to_string).collect()
        };

        Ok(ResourcePattern {
            prefix: prefix.to_string(),
            resource: resource.to_string(),
            scope,
        })
    }

    /// Whether the pattern names specific target-instance keys.
    pub fn has_scope(&self) -> bool {
        !self.scope.is_empty()
    }

    /// Whether the given target-instance key is in the scope list.
    pub fn scope_contains(&self, key: &str) -> bool {
        self.scope.iter().any(|k| k == key)
    }
}

/// Whether a statement is relevant to a `(resource, action)` request.
///
/// The resource segment must equal the requested resource name exactly;
/// substring matching over the raw string would let `users` collide with
/// `users2`. Given resource equality, the statement matches when the
/// requested action is `*`, the statement's actions are the wildcard, or
/// the action is listed.
pub fn statement_matches(statement: &Statement, resource_name: &str, action: &str) -> bool {
    let Ok(pattern) = ResourcePattern::parse(&statement.resource) else {
        return false;
    };
    if pattern.resource != resource_name {
        return false;
    }
    if action == "*" || statement.actions.is_wildcard() {
        return true;
    }
    statement.actions.covers(action)
}
