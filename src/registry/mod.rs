//! Bundle registry for looking up source bundles by name
//!
//! This module provides:
//! - The [`BundleRegistry`] lookup interface the resolver depends on
//! - [`DefinitionRegistry`], backed by YAML bundle definitions

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::config::{BuildConfig, DefinitionFile, parse_definitions};
use crate::domain::SourceBundle;
use crate::error::{
    AssetError, Result, config_not_found, config_parse_failed, config_read_failed,
    duplicate_definition, unknown_bundle,
};

/// Lookup of source bundles by name
pub trait BundleRegistry {
    /// Return the bundle called `name`
    ///
    /// # Errors
    ///
    /// Returns `AssetError::UnknownBundle` if no such bundle is defined.
    fn lookup(&self, name: &str) -> Result<SourceBundle>;
}

/// Registry of bundles declared in definition files
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    bundles: HashMap<String, SourceBundle>,
}

impl DefinitionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the given bundles
    #[cfg(test)]
    pub fn from_bundles(bundles: impl IntoIterator<Item = SourceBundle>) -> Result<Self> {
        let mut registry = Self::new();
        for bundle in bundles {
            registry.insert(bundle)?;
        }
        Ok(registry)
    }

    /// Collect the definitions a build configuration points at
    ///
    /// The `registry` file is read relative to `root`; inline definitions are
    /// rooted at `root` itself.
    pub fn from_config(config: &BuildConfig, root: &Path) -> Result<Self> {
        let mut registry = Self::new();

        if let Some(file) = &config.registry {
            registry.load_file(&root.join(file))?;
        }
        registry.extend(&config.definitions, root)?;

        Ok(registry)
    }

    /// Add a bundle
    ///
    /// # Errors
    ///
    /// Returns `AssetError::DuplicateDefinition` if the name is taken.
    pub fn insert(&mut self, bundle: SourceBundle) -> Result<()> {
        if self.bundles.contains_key(&bundle.name) {
            return Err(duplicate_definition(bundle.name));
        }
        self.bundles.insert(bundle.name.clone(), bundle);
        Ok(())
    }

    /// Add every definition, rooting base directories at `defined_in`
    pub fn extend(&mut self, definitions: &DefinitionFile, defined_in: &Path) -> Result<()> {
        for (name, definition) in definitions {
            self.insert(definition.to_source_bundle(name, defined_in))?;
        }
        Ok(())
    }

    /// Read a YAML definition file
    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(config_not_found(shown));
        }

        let yaml = std::fs::read_to_string(path)
            .map_err(|e| config_read_failed(shown.clone(), e.to_string()))?;
        let definitions = parse_definitions(&yaml).map_err(|err| match err {
            AssetError::ConfigParseFailed { reason, .. } => {
                config_parse_failed(shown.clone(), reason)
            }
            other => other,
        })?;

        debug!(path = %path.display(), count = definitions.len(), "loaded bundle definitions");

        let defined_in = path.parent().unwrap_or_else(|| Path::new(""));
        self.extend(&definitions, defined_in)
    }

    /// Number of defined bundles
    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    /// Whether no bundle is defined
    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl BundleRegistry for DefinitionRegistry {
    fn lookup(&self, name: &str) -> Result<SourceBundle> {
        self.bundles
            .get(name)
            .cloned()
            .ok_or_else(|| unknown_bundle(name))
    }
}
