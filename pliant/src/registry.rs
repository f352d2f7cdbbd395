//! In-memory extension registry.
//!
//! The registry seam is deliberately a trait so hosts can plug in their own
//! loading and caching policy; this module provides the standard map-backed
//! implementation for hosts that register every extension up front.

use pliant_core::{Extension, ExtensionRegistry};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building a [`MapRegistry`].
#[derive(Error, Debug)]
pub enum RegistryBuildError {
    /// The same (capability, name) pair was registered twice.
    #[error("extension `{name}` is already registered for capability `{capability}`")]
    DuplicateExtension {
        /// The capability the registration was scoped to.
        capability: String,
        /// The repeated extension name.
        name: String,
    },
}

/// A map-backed [`ExtensionRegistry`] keyed by capability and extension name.
///
/// Immutable once built; lookups are lock-free.
pub struct MapRegistry {
    extensions: HashMap<String, HashMap<String, Arc<dyn Extension>>>,
}

impl MapRegistry {
    /// Start building a registry.
    pub fn builder() -> MapRegistryBuilder {
        MapRegistryBuilder {
            extensions: HashMap::new(),
        }
    }

    /// Number of registered extensions across all capabilities.
    pub fn len(&self) -> usize {
        self.extensions.values().map(HashMap::len).sum()
    }

    /// Whether no extension is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExtensionRegistry for MapRegistry {
    fn get(&self, capability: &str, name: &str) -> Option<Arc<dyn Extension>> {
        self.extensions
            .get(capability)
            .and_then(|by_name| by_name.get(name))
            .cloned()
    }
}

/// Builder for [`MapRegistry`].
pub struct MapRegistryBuilder {
    extensions: HashMap<String, HashMap<String, Arc<dyn Extension>>>,
}

impl fmt::Debug for MapRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut capabilities: Vec<&str> = self.extensions.keys().map(String::as_str).collect();
        capabilities.sort_unstable();
        f.debug_struct("MapRegistryBuilder")
            .field("capabilities", &capabilities)
            .finish_non_exhaustive()
    }
}

impl MapRegistryBuilder {
    /// Register an extension instance under `(capability, name)`.
    pub fn register(
        mut self,
        capability: impl Into<String>,
        name: impl Into<String>,
        extension: impl Extension + 'static,
    ) -> Result<Self, RegistryBuildError> {
        let capability = capability.into();
        let name = name.into();
        let by_name = self.extensions.entry(capability.clone()).or_default();
        if by_name.contains_key(&name) {
            return Err(RegistryBuildError::DuplicateExtension { capability, name });
        }
        by_name.insert(name, Arc::new(extension));
        Ok(self)
    }

    /// Build the registry.
    pub fn build(self) -> MapRegistry {
        MapRegistry {
            extensions: self.extensions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::NamedExtension;

    #[test]
    fn lookup_is_scoped_by_capability() {
        let registry = MapRegistry::builder()
            .register("LoadBalance", "random", NamedExtension::new("random"))
            .unwrap()
            .register("Cluster", "failover", NamedExtension::new("failover"))
            .unwrap()
            .build();

        assert_eq!(registry.len(), 2);
        assert!(registry.get("LoadBalance", "random").is_some());
        assert!(registry.get("LoadBalance", "failover").is_none());
        assert!(registry.get("Cluster", "failover").is_some());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = MapRegistry::builder()
            .register("LoadBalance", "random", NamedExtension::new("random"))
            .unwrap()
            .register("LoadBalance", "random", NamedExtension::new("random"))
            .unwrap_err();
        assert!(matches!(err, RegistryBuildError::DuplicateExtension { .. }));
    }
}
