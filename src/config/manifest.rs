//! Build manifest written after a successful build
//!
//! One entry per final bundle name: every target plus a pass-through entry
//! for each absorbed source bundle.
//!
//! ```yaml
//! all:
//!   outDir: public/build
//!   outUrl: /build
//!   scriptFiles:
//!   - all-3f2a9c01d4be7e55.js
//!   styleFiles: []
//! core:
//!   scriptFiles: []
//!   styleFiles: []
//!   depends:
//!   - all
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::TargetBundle;
use crate::error::{Result, file_write_failed};

/// One bundle in the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_url: Option<String>,

    #[serde(default)]
    pub script_files: Vec<String>,

    #[serde(default)]
    pub style_files: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

/// Final bundle definitions keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildManifest {
    pub bundles: BTreeMap<String, ManifestEntry>,
}

/// Manifest encoding, chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Yaml,
    Json,
}

impl ManifestFormat {
    /// JSON for `.json` paths, YAML otherwise
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ManifestFormat::Json,
            _ => ManifestFormat::Yaml,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl BuildManifest {
    /// Build the manifest from redirected targets and pass-through names
    pub fn from_build<'a>(
        targets: impl IntoIterator<Item = &'a TargetBundle>,
        pass_through: &BTreeMap<String, String>,
    ) -> Self {
        let mut bundles = BTreeMap::new();

        for target in targets {
            bundles.insert(
                target.name.clone(),
                ManifestEntry {
                    out_dir: non_empty(&target.out_dir),
                    out_url: non_empty(&target.out_url),
                    script_files: target.script_files.clone(),
                    style_files: target.style_files.clone(),
                    depends: target.depends.clone(),
                },
            );
        }

        for (source, target) in pass_through {
            bundles.insert(
                source.clone(),
                ManifestEntry {
                    depends: vec![target.clone()],
                    ..ManifestEntry::default()
                },
            );
        }

        Self { bundles }
    }

    /// Serialize the manifest to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Serialize the manifest to pretty JSON string
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// Parse a manifest from YAML string
    #[cfg(test)]
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Write the manifest to `path` in the format its extension selects
    ///
    /// # Errors
    ///
    /// Returns `AssetError::FileWriteFailed` if the file cannot be written.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = match ManifestFormat::for_path(path) {
            ManifestFormat::Json => self.to_json()?,
            ManifestFormat::Yaml => self.to_yaml()?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| file_write_failed(parent, e))?;
        }
        std::fs::write(path, content).map_err(|e| file_write_failed(path, e))
    }
}
