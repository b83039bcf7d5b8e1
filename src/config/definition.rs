//! Bundle definition records read by the registry
//!
//! A definition file maps bundle names to their resources:
//!
//! ```yaml
//! core:
//!   baseDir: vendor/core
//!   scripts: [core.js]
//!   styles: [css/core.css]
//! widgets:
//!   scripts: [widgets/tabs.js]
//!   depends: [core]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::SourceBundle;
use crate::error::{Result, config_invalid};

/// One bundle as declared in a definition file or inline in the build configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BundleDefinition {
    /// Script files, relative to `base_dir`
    pub scripts: Vec<String>,

    /// Stylesheet files, relative to `base_dir`
    pub styles: Vec<String>,

    /// Directory holding the resources, relative to the defining file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    /// Public URL the resources are served from
    #[serde(skip_serializing_if = "String::is_empty")]
    pub base_url: String,

    /// Bundles that must be loaded first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends: Vec<String>,
}

/// Contents of a definition file
pub type DefinitionFile = BTreeMap<String, BundleDefinition>;

impl BundleDefinition {
    /// Validate the definition of `name`
    ///
    /// # Errors
    ///
    /// Returns `AssetError::ConfigInvalid` for empty names or dependency names.
    pub fn validate(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(config_invalid("bundle names cannot be empty"));
        }
        if let Some(dep) = self.depends.iter().find(|dep| dep.trim().is_empty()) {
            return Err(config_invalid(format!(
                "bundle '{name}' has an empty dependency name '{dep}'"
            )));
        }
        Ok(())
    }

    /// Turn the definition into a source bundle rooted under `defined_in`
    pub fn to_source_bundle(&self, name: &str, defined_in: &Path) -> SourceBundle {
        let base_dir = match &self.base_dir {
            Some(dir) => defined_in.join(dir),
            None => defined_in.to_path_buf(),
        };

        SourceBundle {
            name: name.to_string(),
            scripts: self.scripts.iter().map(PathBuf::from).collect(),
            styles: self.styles.iter().map(PathBuf::from).collect(),
            base_dir,
            base_url: self.base_url.clone(),
            depends: self.depends.clone(),
        }
    }
}

/// Parse a definition file from YAML
///
/// # Errors
///
/// Returns `AssetError::ConfigParseFailed` for malformed YAML or unknown fields.
pub fn parse_definitions(yaml: &str) -> Result<DefinitionFile> {
    let definitions: DefinitionFile = serde_yaml::from_str(yaml)?;
    for (name, definition) in &definitions {
        definition.validate(name)?;
    }
    Ok(definitions)
}
