//! Progress display for suggestion resolution
//!
//! Shows how many rows are still waiting for a result using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for pending rows
pub struct Progress {
    /// Whether progress display is enabled (disabled in quiet mode)
    enabled: bool,
    /// Current progress bar
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Create a disabled progress reporter
    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_active(&self) -> bool {
        self.bar.is_some()
    }

    /// Start a progress bar for a known number of rows
    pub fn start(&mut self, total: u64, message: &str) {
        if !self.enabled {
            return;
        }

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");

        let bar = ProgressBar::new(total);
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Set the number of rows resolved so far and the current total
    pub fn update(&self, resolved: u64, total: u64) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total);
            bar.set_position(resolved);
        }
    }

    /// Hide the bar while `f` writes to the terminal
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match self.bar {
            Some(ref bar) => bar.suspend(f),
            None => f(),
        }
    }

    /// Finish and clear the current progress bar
    pub fn finish_and_clear(&mut self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        self.bar = None;
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_disabled() {
        let mut progress = Progress::disabled();
        progress.start(10, "test");
        assert!(!progress.is_active());
        progress.update(3, 10);
        assert_eq!(progress.suspend(|| 42), 42);
        progress.finish_and_clear();
    }

    #[test]
    fn test_progress_enabled() {
        let mut progress = Progress::new(true);
        progress.start(3, "Resolving");
        assert!(progress.is_active());
        progress.update(1, 3);
        progress.update(2, 2);
        progress.finish_and_clear();
        assert!(!progress.is_active());
    }
}
