//! Progress bar display for builds

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress display for (target, kind) build jobs
pub struct ProgressDisplay {
    job_pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a progress display with total job count
    ///
    /// Draws to stderr; hidden when stderr is not a terminal.
    pub fn new(total_jobs: u64) -> Self {
        let job_pb = ProgressBar::with_draw_target(Some(total_jobs), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar().template("[{bar:40.cyan/blue}] {pos}/{len} {msg}") {
            job_pb.set_style(style.progress_chars("#>-"));
        }

        Self { job_pb }
    }

    /// Display that never draws
    pub fn hidden() -> Self {
        Self {
            job_pb: ProgressBar::hidden(),
        }
    }

    /// Record one finished job
    pub fn job_done(&self, label: &str) {
        // Truncate long labels for display
        let display = if label.chars().count() > 50 {
            let tail: String = label.chars().skip(label.chars().count() - 47).collect();
            format!("...{tail}")
        } else {
            label.to_string()
        };
        self.job_pb.set_message(display);
        self.job_pb.inc(1);
    }

    /// Finish after all jobs succeeded
    pub fn finish(&self) {
        self.job_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.job_pb.abandon();
    }
}
