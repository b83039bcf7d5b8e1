//! Command implementations for the assetpack CLI

pub mod build;
pub mod completions;
pub mod init;
pub mod version;
