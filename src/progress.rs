//! Progress display and guarded console output.
//!
//! Worker tasks must never write to the terminal directly: everything
//! goes through one [`Reporter`] so diagnostics and progress bars do
//! not interleave. `MultiProgress` serializes all drawing internally,
//! which makes the reporter safe to clone into concurrent tasks.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Shared handle for progress bars and console messages.
#[derive(Clone)]
pub struct Reporter {
    multi: MultiProgress,
}

impl Reporter {
    /// Creates a reporter drawing to stderr.
    pub fn new() -> Self {
        Self { multi: MultiProgress::new() }
    }

    /// Creates a reporter that draws nothing. Used by tests and by the
    /// quiet path so call sites need no special casing.
    pub fn hidden() -> Self {
        Self { multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()) }
    }

    /// Prints a line above any active bars. One writer at a time.
    pub fn println(&self, message: impl AsRef<str>) {
        let _ = self.multi.println(message.as_ref());
    }

    /// Unbounded page counter for the catalog fetch phase.
    pub fn page_spinner(&self, prefix: &str) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(
            ProgressStyle::with_template("{spinner} {prefix}: {pos} pages {msg}")
                .expect("valid template"),
        );
        bar.set_prefix(prefix.to_string());
        bar
    }

    /// Bounded bar for the spec-scraping phase.
    pub fn product_bar(&self, total: u64) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} products {msg}")
                .expect("valid template"),
        );
        bar
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
