//! The build pipeline
//!
//! ```text
//! resolve -> partition -> target order -> build (parallel) -> redirect -> manifest
//! ```
//!
//! Every stage except the build runs sequentially on the calling thread. The
//! build runs one job per (target, kind) pair on a rayon pool; jobs write
//! disjoint files and their results are applied once all of them finished.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::bundler::{Compressor, build_target_kind, compress};
use crate::config::{BuildConfig, BuildManifest};
use crate::domain::{ResourceKind, TargetBundle};
use crate::error::{Result, io_error};
use crate::partition::partition;
use crate::progress::ProgressDisplay;
use crate::redirect::{Redirected, redirect, target_order};
use crate::registry::BundleRegistry;
use crate::resolver::{ResolvedBundles, resolve};

/// Result of one finished build job
type JobResult = (String, ResourceKind, Option<Vec<String>>);

/// Everything a successful run produced
#[derive(Debug)]
pub struct BuildOutcome {
    /// Number of source bundles resolved
    pub resolved: usize,
    /// Built and redirected targets
    pub redirected: Redirected,
    /// Manifest of every final bundle name
    pub manifest: BuildManifest,
}

/// One configured build
pub struct Pipeline<'a> {
    config: &'a BuildConfig,
    root: PathBuf,
    script_compressor: Box<dyn Compressor>,
    style_compressor: Box<dyn Compressor>,
    jobs: Option<usize>,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    /// Pipeline for `config`, with relative output directories under `root`
    pub fn new(config: &'a BuildConfig, root: impl Into<PathBuf>) -> Self {
        let timeout = config.compress_timeout();
        Self {
            config,
            root: root.into(),
            script_compressor: compress::from_template(
                config.compressor(ResourceKind::Script),
                timeout,
            ),
            style_compressor: compress::from_template(
                config.compressor(ResourceKind::Style),
                timeout,
            ),
            jobs: None,
            show_progress: false,
        }
    }

    /// Replace the compressor used for `kind`
    #[cfg(test)]
    #[must_use]
    pub fn with_compressor(mut self, kind: ResourceKind, compressor: Box<dyn Compressor>) -> Self {
        match kind {
            ResourceKind::Script => self.script_compressor = compressor,
            ResourceKind::Style => self.style_compressor = compressor,
        }
        self
    }

    /// Limit the number of parallel build jobs
    #[must_use]
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Show a progress bar while building
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn compressor(&self, kind: ResourceKind) -> &dyn Compressor {
        match kind {
            ResourceKind::Script => self.script_compressor.as_ref(),
            ResourceKind::Style => self.style_compressor.as_ref(),
        }
    }

    /// Run every stage, stopping at the first error
    ///
    /// # Errors
    ///
    /// Returns the first error any stage reports.
    pub fn run(&self, registry: &dyn BundleRegistry) -> Result<BuildOutcome> {
        let requested = self.config.requested_bundles();
        info!(requested = requested.len(), "resolving bundles");
        let resolved = resolve(&requested, registry)?;

        let mut targets = partition(&self.config.targets, &resolved)?;
        let order = target_order(&targets, &resolved)?;
        info!(
            bundles = resolved.len(),
            targets = targets.len(),
            "building targets"
        );

        for (name, kind, files) in self.build_all(&targets, &order, &resolved)? {
            if let (Some(files), Some(target)) = (files, targets.get_mut(&name)) {
                target.set_files(kind, files);
            }
        }

        let redirected = redirect(targets, &resolved)?;
        let manifest = BuildManifest::from_build(redirected.targets.values(), &redirected.pass_through);

        Ok(BuildOutcome {
            resolved: resolved.len(),
            redirected,
            manifest,
        })
    }

    /// Build every (target, kind) pair, targets taken in `order`
    fn build_all(
        &self,
        targets: &BTreeMap<String, TargetBundle>,
        order: &[String],
        resolved: &ResolvedBundles,
    ) -> Result<Vec<JobResult>> {
        let jobs: Vec<(&TargetBundle, ResourceKind)> = order
            .iter()
            .filter_map(|name| targets.get(name))
            .flat_map(|target| ResourceKind::ALL.map(|kind| (target, kind)))
            .collect();

        let progress = if self.show_progress {
            ProgressDisplay::new(jobs.len() as u64)
        } else {
            ProgressDisplay::hidden()
        };

        let build = || {
            jobs.par_iter()
                .map(|&(target, kind)| {
                    let files =
                        build_target_kind(target, kind, resolved, self.compressor(kind), &self.root)?;
                    progress.job_done(&format!("{} ({kind})", target.name));
                    Ok((target.name.clone(), kind, files))
                })
                .collect::<Result<Vec<_>>>()
        };

        let results = match self.jobs {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| io_error(format!("failed to start build threads: {e}")))?
                .install(build),
            None => build(),
        };

        match &results {
            Ok(_) => progress.finish(),
            Err(_) => progress.abandon(),
        }
        results
    }
}
