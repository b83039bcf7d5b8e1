//! Configuration errors

use super::AssetError;

/// Creates a config not found error
pub fn not_found(path: impl Into<String>) -> AssetError {
    AssetError::ConfigNotFound { path: path.into() }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> AssetError {
    AssetError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> AssetError {
    AssetError::ConfigInvalid {
        message: message.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> AssetError {
    AssetError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a missing target field error
pub fn missing_target_field(target: impl Into<String>, field: impl Into<String>) -> AssetError {
    AssetError::MissingTargetField {
        target: target.into(),
        field: field.into(),
    }
}

/// Creates an error for a bundle listed by two targets
pub fn claimed_twice(
    bundle: impl Into<String>,
    first: impl Into<String>,
    second: impl Into<String>,
) -> AssetError {
    AssetError::BundleClaimedTwice {
        bundle: bundle.into(),
        first: first.into(),
        second: second.into(),
    }
}

/// Creates an error for a second catch-all target
pub fn multiple_implicit_targets(first: impl Into<String>, second: impl Into<String>) -> AssetError {
    AssetError::MultipleImplicitTargets {
        first: first.into(),
        second: second.into(),
    }
}

/// Creates an error for a resolved bundle no target absorbs
pub fn unassigned_bundle(name: impl Into<String>, required_by: impl Into<String>) -> AssetError {
    AssetError::UnassignedBundle {
        name: name.into(),
        required_by: required_by.into(),
    }
}

/// Creates an error for a target named like a source bundle
pub fn target_name_collision(name: impl Into<String>) -> AssetError {
    AssetError::TargetNameCollision { name: name.into() }
}
