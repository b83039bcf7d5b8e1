use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Arguments for the build command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Build with ./assetpack.yaml:\n    assetpack build -o public/manifest.yaml\n\n\
                  Write a JSON manifest:\n    assetpack build -o public/manifest.json\n\n\
                  Allow slow compressors and limit parallelism:\n    assetpack build -o manifest.yaml --timeout 900 -j 2")]
pub struct BuildArgs {
    /// Build configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILE, env = "ASSETPACK_CONFIG")]
    pub config: PathBuf,

    /// Manifest output path (JSON if it ends in .json, YAML otherwise)
    #[arg(long, short = 'o')]
    pub output: PathBuf,

    /// Seconds one compressor run may take (overrides compressTimeout)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Number of parallel build jobs
    #[arg(long, short = 'j', value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,
}
