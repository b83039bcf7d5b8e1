//! Configuration file handling for assetpack
//!
//! This module contains data structures for:
//! - `assetpack.yaml` - Build configuration
//! - Bundle definition files read by the registry
//! - The build manifest written after a build

pub mod build;
pub mod definition;
pub mod manifest;
pub mod template;

// Re-export commonly used types
pub use build::{BuildConfig, DEFAULT_CONFIG_FILE, TargetConfig};
pub use definition::{BundleDefinition, DefinitionFile, parse_definitions};
pub use manifest::BuildManifest;
