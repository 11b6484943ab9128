//! Resource Registry - Lookup of resource and data source implementations
//!
//! The registry is built once at start-up and passed by reference to the
//! [`Provider`](super::Provider). Each service module contributes its types
//! through [`crate::services::register_all`].

use super::lifecycle::{DataSource, Resource};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Resource and data source implementations keyed by type name.
#[derive(Default)]
pub struct Registry {
    resources: HashMap<&'static str, Arc<dyn Resource>>,
    data_sources: HashMap<&'static str, Arc<dyn DataSource>>,
}

impl Registry {
    /// Registry holding every supported type.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        crate::services::register_all(&mut registry);
        tracing::debug!(
            "registered {} resources and {} data sources",
            registry.resources.len(),
            registry.data_sources.len()
        );
        registry
    }

    /// Registry with nothing registered.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn register_resource(&mut self, resource: impl Resource + 'static) {
        let name = resource.resource_type();
        if self.resources.insert(name, Arc::new(resource)).is_some() {
            tracing::warn!("resource type {} registered twice", name);
        }
    }

    pub fn register_data_source(&mut self, data_source: impl DataSource + 'static) {
        let name = data_source.data_source_type();
        if self.data_sources.insert(name, Arc::new(data_source)).is_some() {
            tracing::warn!("data source type {} registered twice", name);
        }
    }

    /// Get a resource implementation by type name
    pub fn resource(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownType {
                kind: "resource",
                name: name.to_string(),
            })
    }

    /// Get a data source implementation by type name
    pub fn data_source(&self, name: &str) -> Result<Arc<dyn DataSource>> {
        self.data_sources
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownType {
                kind: "data source",
                name: name.to_string(),
            })
    }

    /// All resource type names, sorted
    pub fn resource_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// All data source type names, sorted
    pub fn data_source_types(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.data_sources.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("resources", &self.resource_types())
            .field("data_sources", &self.data_source_types())
            .finish()
    }
}
