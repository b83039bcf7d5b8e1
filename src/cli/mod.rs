//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - init: Init command arguments
//! - build: Build command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod build;
pub mod completions;
pub mod init;

pub use build::BuildArgs;
pub use completions::CompletionsArgs;
pub use init::InitArgs;

/// assetpack - dependency-aware asset bundler
///
/// Concatenate and compress interdependent script and stylesheet bundles.
#[derive(Parser, Debug)]
#[command(
    name = "assetpack",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Dependency-aware bundler for scripts and stylesheets",
    long_about = "assetpack resolves named bundles of scripts and stylesheets with their \
                  dependencies, concatenates them into output targets in dependency order, \
                  compresses each target with an external tool and writes a manifest mapping \
                  every bundle name to its built files.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  assetpack init                             \x1b[90m# Write assetpack.yaml\x1b[0m\n   \
                  assetpack build -o manifest.yaml           \x1b[90m# Build and write the manifest\x1b[0m\n   \
                  assetpack build -c site.yaml -o out.json   \x1b[90m# Other config, JSON manifest\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a template configuration file
    Init(InitArgs),

    /// Build every target and write the manifest
    Build(BuildArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
