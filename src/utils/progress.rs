//! Progress indicators for batch theme operations.
//!
//! `themes install --all` and `themes publish --all` walk every theme one by
//! one; the bar shows which theme is being processed. Progress output is
//! suppressed when `STAGEHAND_NO_PROGRESS` is set (the CLI sets it for
//! `--no-progress` and `--quiet`).

use indicatif::{ProgressBar as Bar, ProgressStyle};

use crate::cli::NO_PROGRESS_ENV_VAR;

/// Bar over a batch of themes. Cloning shares the same bar.
///
/// ```rust
/// use stagehand_cli::utils::progress::ProgressBar;
///
/// let progress = ProgressBar::new(3);
/// for slug in ["aurora", "minimal", "docs"] {
///     progress.set_message(slug);
///     progress.inc(1);
/// }
/// progress.finish_with_message("Published 3 themes");
/// ```
#[derive(Clone)]
pub struct ProgressBar {
    bar: Bar,
}

impl ProgressBar {
    /// A bar of `len` steps, hidden when progress output is switched off.
    #[must_use]
    pub fn new(len: u64) -> Self {
        if std::env::var_os(NO_PROGRESS_ENV_VAR).is_some() {
            return Self::hidden();
        }
        let bar = Bar::new(len);
        bar.set_style(batch_style());
        Self {
            bar,
        }
    }

    /// A bar that accepts updates and never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: Bar::hidden(),
        }
    }

    /// Name of the theme being processed.
    pub fn set_message(&self, slug: impl Into<String>) {
        self.bar.set_message(slug.into());
    }

    pub fn inc(&self, steps: u64) {
        self.bar.inc(steps);
    }

    pub fn finish_with_message(&self, summary: impl Into<String>) {
        self.bar.finish_with_message(summary.into());
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

fn batch_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} [{bar:32.cyan/blue}] {pos}/{len} themes  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}
