//! Resource and action catalog
//!
//! The catalog is the registry of resource names and the actions valid on
//! each of them. It is populated by the host application (typically from a
//! scan of its own route or controller definitions) and is strictly
//! read-only here: both the validator and the decision engine take it as an
//! injected snapshot so tests can supply an in-memory fake.

use std::collections::HashMap;

/// An action that can be performed on a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDef {
    pub name: String,
    /// Scopeable actions may be restricted to specific target-instance keys
    /// (e.g. `delete` on record 5) rather than the resource as a whole.
    pub is_scopeable: bool,
}

impl ActionDef {
    pub fn new(name: impl Into<String>, is_scopeable: bool) -> Self {
        ActionDef {
            name: name.into(),
            is_scopeable,
        }
    }
}

/// A resource known to the catalog, with its valid actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDef {
    pub name: String,
    pub description: Option<String>,
    pub actions: Vec<ActionDef>,
}

impl ResourceDef {
    /// Create a resource definition with no actions.
    pub fn new(name: impl Into<String>) -> Self {
        ResourceDef {
            name: name.into(),
            description: None,
            actions: Vec::new(),
        }
    }

    /// Builder: set the description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: add an action.
    pub fn action(mut self, name: impl Into<String>, is_scopeable: bool) -> Self {
        self.actions.push(ActionDef::new(name, is_scopeable));
        self
    }

    /// Look up an action by name.
    pub fn find_action(&self, name: &str) -> Option<&ActionDef> {
        self.actions.iter().find(|a| a.name == name)
    }
}

/// Read-only lookup interface the engine depends on.
///
/// Implement this over whatever store holds the catalog; decisions only ever
/// call [`resolve`](ResourceCatalog::resolve).
pub trait ResourceCatalog {
    fn resolve(&self, name: &str) -> Option<&ResourceDef>;
}

/// Catalog backed by a plain map. Suitable for tests and for hosts that
/// materialize their catalog once at startup.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    resources: HashMap<String, ResourceDef>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a resource definition.
    pub fn register(&mut self, resource: ResourceDef) {
        self.resources.insert(resource.name.clone(), resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl ResourceCatalog for InMemoryCatalog {
    fn resolve(&self, name: &str) -> Option<&ResourceDef> {
        self.resources.get(name)
    }
}

impl FromIterator<ResourceDef> for InMemoryCatalog {
    fn from_iter<T: IntoIterator<Item = ResourceDef>>(iter: T) -> Self {
        let mut catalog = InMemoryCatalog::new();
        for resource in iter {
            catalog.register(resource);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_registered_resource() {
        let mut catalog = InMemoryCatalog::new();
        catalog.register(
            ResourceDef::new("users")
                .action("read", false)
                .action("delete", true),
        );

        let resource = catalog.resolve("users").unwrap();
        assert_eq!(resource.name, "users");
        assert!(!resource.find_action("read").unwrap().is_scopeable);
        assert!(resource.find_action("delete").unwrap().is_scopeable);
        assert!(resource.find_action("publish").is_none());
    }

    #[test]
    fn test_resolve_unknown_resource() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.resolve("users").is_none());
    }

    #[test]
    fn test_from_iterator() {
        let catalog: InMemoryCatalog = vec![
            ResourceDef::new("users").action("read", false),
            ResourceDef::new("posts").action("write", false),
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.resolve("posts").is_some());
    }
}
