//! Dependency resolution for source bundles
//!
//! This module handles:
//! - Loading the transitive closure of the requested bundles from the registry
//! - Circular dependency detection
//! - The resolution order every later stage uses as its canonical order

pub mod graph;
pub mod sort;

use std::collections::HashMap;

use tracing::debug;

use crate::domain::SourceBundle;
use crate::error::Result;
use crate::registry::BundleRegistry;

pub use graph::{DependencyList, order_list, rank_index};
pub use sort::dependency_order;

/// Source bundles loaded for one run, with their resolution order
#[derive(Debug, Clone, Default)]
pub struct ResolvedBundles {
    bundles: HashMap<String, SourceBundle>,
    /// Completion order: dependencies before dependents
    order: Vec<String>,
}

impl ResolvedBundles {
    /// Bundle by name
    pub fn get(&self, name: &str) -> Option<&SourceBundle> {
        self.bundles.get(name)
    }

    /// Whether `name` was resolved
    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    /// Names in resolution order
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Bundles in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &SourceBundle> {
        self.order.iter().filter_map(|name| self.bundles.get(name))
    }

    /// Number of resolved bundles
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Adjacency list of the resolved bundles
    pub fn dependency_list(&self) -> DependencyList {
        self.bundles
            .iter()
            .map(|(name, bundle)| (name.clone(), bundle.depends.clone()))
            .collect()
    }
}

/// Resolve `names` and every bundle they depend on
///
/// Each bundle is fetched from the registry on first reference. The returned
/// order lists every dependency strictly before the bundles needing it, with
/// independent requested bundles kept in request order.
///
/// # Errors
///
/// - `AssetError::UnknownBundle` if the registry cannot find a name
/// - `AssetError::CircularDependency` naming the bundle where a cycle closes
///
/// # Example
///
/// ```text
/// widgets depends on core
/// requested: [widgets]
///
/// order: [core, widgets]
/// ```
pub fn resolve(names: &[String], registry: &dyn BundleRegistry) -> Result<ResolvedBundles> {
    let mut bundles = HashMap::new();

    let order = dependency_order(names, |name| {
        let bundle = registry.lookup(name)?;
        debug!(bundle = name, depends = ?bundle.depends, "resolved bundle");
        let depends = bundle.depends.clone();
        bundles.insert(name.to_string(), bundle);
        Ok(depends)
    })?;

    Ok(ResolvedBundles { bundles, order })
}
