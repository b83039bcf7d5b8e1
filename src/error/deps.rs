//! Dependency errors

use super::AssetError;

/// Creates a circular dependency error for the node found still in progress
pub fn circular(name: impl Into<String>, chain: impl Into<String>) -> AssetError {
    AssetError::CircularDependency {
        name: name.into(),
        chain: chain.into(),
    }
}
