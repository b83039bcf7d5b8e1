//! assetpack - dependency-aware asset bundler
//!
//! Resolves named bundles of scripts and stylesheets with their dependencies,
//! folds them into compressed output targets and writes a manifest that maps
//! every bundle name onto the built files.

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bundler;
mod cli;
mod commands;
mod config;
mod domain;
mod error;
mod hash;
mod partition;
mod pipeline;
mod progress;
mod redirect;
mod registry;
mod resolver;

use cli::{Cli, Commands};

/// Install the stderr log subscriber; `RUST_LOG` wins over `--verbose`
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Build(args) => commands::build::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
