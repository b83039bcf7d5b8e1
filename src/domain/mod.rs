//! Domain models for assetpack
//!
//! Plain records shared by every stage of the pipeline. Source bundles come
//! from the registry, target bundles from the build configuration.

pub mod bundle;

pub use bundle::{ResourceKind, SourceBundle, TargetBundle};
