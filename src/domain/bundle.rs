//! Bundle domain types

use std::fmt;
use std::path::PathBuf;

/// Kind of resource file a bundle carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Script,
    Style,
}

impl ResourceKind {
    /// All kinds, in build order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Script, ResourceKind::Style];

    /// Whether concatenated content needs relative references rewritten
    pub fn rewrites_references(self) -> bool {
        matches!(self, ResourceKind::Style)
    }

    /// Field name used for this kind's patterns and file lists
    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Script => "script",
            ResourceKind::Style => "style",
        }
    }

    /// File extension of intermediate artifacts
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Script => "js",
            ResourceKind::Style => "css",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A named set of resource files loaded from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBundle {
    pub name: String,
    pub scripts: Vec<PathBuf>,
    pub styles: Vec<PathBuf>,
    /// Directory the resource paths are relative to
    pub base_dir: PathBuf,
    pub base_url: String,
    /// Names of the bundles this one needs loaded first
    pub depends: Vec<String>,
}

impl SourceBundle {
    /// Create an empty bundle rooted at `base_dir`
    pub fn new(name: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            scripts: Vec::new(),
            styles: Vec::new(),
            base_dir: base_dir.into(),
            base_url: String::new(),
            depends: Vec::new(),
        }
    }

    /// Resource paths of the given kind, as declared
    pub fn files(&self, kind: ResourceKind) -> &[PathBuf] {
        match kind {
            ResourceKind::Script => &self.scripts,
            ResourceKind::Style => &self.styles,
        }
    }

    /// Resource paths of the given kind, qualified by the base directory
    pub fn qualified_files(&self, kind: ResourceKind) -> Vec<PathBuf> {
        self.files(kind)
            .iter()
            .map(|file| self.base_dir.join(file))
            .collect()
    }
}

/// An output bundle absorbing one or more source bundles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetBundle {
    pub name: String,
    /// Source bundles before redirection, other targets afterwards
    pub depends: Vec<String>,
    /// Output directory as written in the configuration
    pub out_dir: String,
    pub out_url: String,
    pub script_pattern: Option<String>,
    pub style_pattern: Option<String>,
    pub script_files: Vec<String>,
    pub style_files: Vec<String>,
}

impl TargetBundle {
    /// Output filename pattern for the given kind
    pub fn pattern(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Script => self.script_pattern.as_deref(),
            ResourceKind::Style => self.style_pattern.as_deref(),
        }
    }

    /// Built output files for the given kind
    pub fn files(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Script => &self.script_files,
            ResourceKind::Style => &self.style_files,
        }
    }

    /// Record the built output files for the given kind
    pub fn set_files(&mut self, kind: ResourceKind, files: Vec<String>) {
        match kind {
            ResourceKind::Script => self.script_files = files,
            ResourceKind::Style => self.style_files = files,
        }
    }
}
