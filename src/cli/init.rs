use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_FILE;

/// Arguments for the init command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Write assetpack.yaml in the current directory:\n    assetpack init\n\n\
                  Write to another path:\n    assetpack init config/assets.yaml\n\n\
                  Replace an existing file:\n    assetpack init --force")]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long, short = 'f')]
    pub force: bool,
}
