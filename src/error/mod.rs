//! Error types and handling for assetpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`bundle`]: Unknown or duplicated bundles
//! - [`deps`]: Dependency graph errors
//! - [`config`]: Configuration and target assignment errors
//! - [`compress`]: External compressor errors
//! - [`fs`]: File system errors

pub mod bundle;
pub mod compress;
pub mod config;
pub mod deps;
pub mod fs;

pub use bundle::{duplicate_definition, unknown as unknown_bundle};
pub use compress::{failed as compression_failed, timed_out as compressor_timeout};
pub use config::{
    claimed_twice, invalid as config_invalid, missing_target_field, multiple_implicit_targets,
    not_found as config_not_found, parse_failed as config_parse_failed,
    read_failed as config_read_failed, target_name_collision, unassigned_bundle,
};
pub use deps::circular as circular_dependency;
pub use fs::{io_error, read_failed as file_read_failed, write_failed as file_write_failed};

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for assetpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum AssetError {
    // Bundle errors
    #[error("Bundle '{name}' not found")]
    #[diagnostic(
        code(assetpack::bundle::unknown),
        help("Check that the bundle is defined in the registry file or under 'definitions'")
    )]
    UnknownBundle { name: String },

    #[error("Bundle '{name}' is defined more than once")]
    #[diagnostic(
        code(assetpack::bundle::duplicate),
        help("Each bundle name may appear once across 'registry' and 'definitions'")
    )]
    DuplicateDefinition { name: String },

    // Dependency errors
    #[error("Circular dependency detected at '{name}': {chain}")]
    #[diagnostic(
        code(assetpack::deps::circular),
        help("Remove one of the 'depends' entries along the reported chain")
    )]
    CircularDependency { name: String, chain: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(assetpack::config::not_found),
        help("Run 'assetpack init' to generate a template configuration")
    )]
    ConfigNotFound { path: String },

    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(assetpack::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(assetpack::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(assetpack::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Target '{target}' is missing required field '{field}'")]
    #[diagnostic(code(assetpack::config::missing_field))]
    MissingTargetField { target: String, field: String },

    #[error("Bundle '{bundle}' is claimed by both target '{first}' and target '{second}'")]
    #[diagnostic(
        code(assetpack::config::claimed_twice),
        help("A source bundle can be absorbed by exactly one target")
    )]
    BundleClaimedTwice {
        bundle: String,
        first: String,
        second: String,
    },

    #[error("Targets '{first}' and '{second}' both have an empty 'depends' list")]
    #[diagnostic(
        code(assetpack::config::multiple_implicit),
        help("Only one target may act as the catch-all target")
    )]
    MultipleImplicitTargets { first: String, second: String },

    #[error("Bundle '{name}' (required by '{required_by}') is not assigned to any target")]
    #[diagnostic(
        code(assetpack::config::unassigned),
        help("List it in a target's 'depends' or add a catch-all target with no 'depends'")
    )]
    UnassignedBundle { name: String, required_by: String },

    #[error("Target '{name}' has the same name as a source bundle")]
    #[diagnostic(code(assetpack::config::name_collision))]
    TargetNameCollision { name: String },

    // Compression errors
    #[error("Compression of target '{target}' produced no readable output at {output}: {reason}")]
    #[diagnostic(
        code(assetpack::compress::failed),
        help("Run the compressor command by hand on the reported file to see its output")
    )]
    CompressionFailed {
        target: String,
        output: String,
        reason: String,
    },

    #[error("Compressor did not finish within {seconds}s: {command}")]
    #[diagnostic(
        code(assetpack::compress::timeout),
        help("Raise 'compressTimeout' or pass --timeout")
    )]
    CompressorTimeout { command: String, seconds: u64 },

    // File system errors
    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(assetpack::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}: {reason}")]
    #[diagnostic(code(assetpack::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(assetpack::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for AssetError {
    fn from(err: std::io::Error) -> Self {
        AssetError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for AssetError {
    fn from(err: serde_yaml::Error) -> Self {
        AssetError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        AssetError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AssetError>;
