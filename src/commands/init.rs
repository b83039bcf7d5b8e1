//! Init command implementation
//!
//! Writes the commented template configuration.

use console::Style;

use crate::cli::InitArgs;
use crate::config::template::TEMPLATE;
use crate::error::{Result, config_invalid, file_write_failed};

/// Run init command
pub fn run(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(config_invalid(format!(
            "'{}' already exists (use --force to overwrite)",
            args.path.display()
        )));
    }

    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| file_write_failed(parent, e))?;
    }
    std::fs::write(&args.path, TEMPLATE).map_err(|e| file_write_failed(&args.path, e))?;

    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Created"),
        args.path.display()
    );

    Ok(())
}
