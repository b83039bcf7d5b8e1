//! Bundle lookup errors

use super::AssetError;

/// Creates an unknown bundle error
pub fn unknown(name: impl Into<String>) -> AssetError {
    AssetError::UnknownBundle { name: name.into() }
}

/// Creates a duplicate definition error
pub fn duplicate_definition(name: impl Into<String>) -> AssetError {
    AssetError::DuplicateDefinition { name: name.into() }
}
