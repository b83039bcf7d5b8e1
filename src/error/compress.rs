//! External compressor errors

use super::AssetError;

/// Creates a compression failed error
pub fn failed(
    target: impl Into<String>,
    output: impl Into<String>,
    reason: impl Into<String>,
) -> AssetError {
    AssetError::CompressionFailed {
        target: target.into(),
        output: output.into(),
        reason: reason.into(),
    }
}

/// Creates a compressor timeout error
pub fn timed_out(command: impl Into<String>, seconds: u64) -> AssetError {
    AssetError::CompressorTimeout {
        command: command.into(),
        seconds,
    }
}
