//! Build configuration (assetpack.yaml) data structures

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::BundleDefinition;
use crate::domain::ResourceKind;
use crate::error::{
    AssetError, Result, config_invalid, config_not_found, config_parse_failed, config_read_failed,
};

/// Default file name looked up by `assetpack build`
pub const DEFAULT_CONFIG_FILE: &str = "assetpack.yaml";

/// Seconds one compressor run may take unless configured otherwise
pub const DEFAULT_COMPRESS_TIMEOUT_SECS: u64 = 300;

/// Build configuration from assetpack.yaml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct BuildConfig {
    /// Source bundles to resolve
    #[serde(default)]
    pub bundles: Vec<String>,

    /// Output targets keyed by name
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,

    /// Shell template compressing scripts, with `{from}` and `{to}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_compressor: Option<String>,

    /// Shell template compressing stylesheets, with `{from}` and `{to}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_compressor: Option<String>,

    /// Seconds one compressor run may take
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compress_timeout: Option<u64>,

    /// Bundle definition file, relative to this configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Bundle definitions declared inline
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, BundleDefinition>,
}

/// One output target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TargetConfig {
    /// Source bundles this target absorbs; empty marks the catch-all target
    #[serde(default)]
    pub depends: Vec<String>,

    /// Directory the built files are written to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    /// Public URL of `out_dir`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_url: Option<String>,

    /// Script output file name, `{hash}` is replaced by the content hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_pattern: Option<String>,

    /// Stylesheet output file name, `{hash}` is replaced by the content hash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_pattern: Option<String>,
}

impl BuildConfig {
    /// Parse build configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate the configuration at `path`
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `path` when the file is missing,
    /// unreadable, malformed or invalid.
    pub fn load(path: &Path) -> Result<Self> {
        let shown = path.display().to_string();
        if !path.is_file() {
            return Err(config_not_found(shown));
        }

        let yaml = std::fs::read_to_string(path)
            .map_err(|e| config_read_failed(shown.clone(), e.to_string()))?;

        Self::from_yaml(&yaml).map_err(|err| match err {
            AssetError::ConfigParseFailed { reason, .. } => config_parse_failed(shown, reason),
            other => other,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.registry.is_none() && self.definitions.is_empty() {
            return Err(config_invalid(
                "no bundle definitions: set 'registry' or 'definitions'",
            ));
        }

        for kind in ResourceKind::ALL {
            if let Some(template) = self.compressor(kind) {
                if !template.contains("{to}") {
                    return Err(config_invalid(format!(
                        "{kind}Compressor '{template}' has no '{{to}}' placeholder"
                    )));
                }
            }
        }

        for (name, target) in &self.targets {
            if name.trim().is_empty() {
                return Err(config_invalid("target names cannot be empty"));
            }
            if let Some(dep) = target.depends.iter().find(|dep| dep.trim().is_empty()) {
                return Err(config_invalid(format!(
                    "target '{name}' lists an empty bundle name '{dep}'"
                )));
            }
        }

        for (name, definition) in &self.definitions {
            definition.validate(name)?;
        }

        Ok(())
    }

    /// Compressor template configured for `kind`
    pub fn compressor(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Script => self.script_compressor.as_deref(),
            ResourceKind::Style => self.style_compressor.as_deref(),
        }
    }

    /// Time one compressor run may take
    pub fn compress_timeout(&self) -> Duration {
        Duration::from_secs(
            self.compress_timeout
                .unwrap_or(DEFAULT_COMPRESS_TIMEOUT_SECS),
        )
    }

    /// Names handed to the resolver
    ///
    /// `bundles` first, then each target's explicit members in target name
    /// order, without duplicates.
    pub fn requested_bundles(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.bundles
            .iter()
            .chain(self.targets.values().flat_map(|target| target.depends.iter()))
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}
