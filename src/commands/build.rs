//! Build command implementation
//!
//! Loads the configuration, runs the pipeline and writes the manifest.

use std::path::{Path, PathBuf};

use console::Style;
use tracing::info;

use crate::cli::BuildArgs;
use crate::config::BuildConfig;
use crate::domain::ResourceKind;
use crate::error::{Result, config_invalid, io_error};
use crate::pipeline::{BuildOutcome, Pipeline};
use crate::registry::DefinitionRegistry;

/// Run build command
pub fn run(args: BuildArgs) -> Result<()> {
    let mut config = BuildConfig::load(&args.config)?;
    if let Some(seconds) = args.timeout {
        config.compress_timeout = Some(seconds);
    }

    let root = config_root(&args.config)?;
    info!(root = %root.display(), "loaded configuration");

    let registry = DefinitionRegistry::from_config(&config, &root)?;
    if registry.is_empty() {
        return Err(config_invalid("no bundles are defined"));
    }
    info!(definitions = registry.len(), "loaded bundle definitions");

    let outcome = Pipeline::new(&config, &root)
        .with_jobs(args.jobs.map(|jobs| jobs as usize))
        .with_progress(console::Term::stderr().is_term())
        .run(&registry)?;

    outcome.manifest.write(&args.output)?;
    print_summary(&outcome, &args.output);

    Ok(())
}

/// Directory relative paths in the configuration are resolved against
fn config_root(config: &Path) -> Result<PathBuf> {
    let parent = match config.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };

    dunce::canonicalize(&parent).map_err(|e| {
        io_error(format!(
            "failed to resolve configuration directory {}: {e}",
            parent.display()
        ))
    })
}

fn print_summary(outcome: &BuildOutcome, manifest: &Path) {
    let bold = Style::new().bold();
    let target_style = Style::new().bold().yellow();
    let dim = Style::new().dim();

    println!(
        "{} {} bundles into {} targets",
        Style::new().green().bold().apply_to("Built"),
        outcome.resolved,
        outcome.redirected.targets.len()
    );

    for name in &outcome.redirected.order {
        let Some(target) = outcome.redirected.targets.get(name) else {
            continue;
        };
        println!("  {}", target_style.apply_to(&target.name));
        for kind in ResourceKind::ALL {
            for file in target.files(kind) {
                println!(
                    "    {} {}/{}",
                    dim.apply_to(format!("{kind:<6}")),
                    target.out_dir.trim_end_matches('/'),
                    file
                );
            }
        }
    }

    println!("{} {}", bold.apply_to("Manifest:"), manifest.display());
}
