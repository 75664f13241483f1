//! Progressive suggestion resolution
//!
//! This module provides:
//! - `SuggestionResolver`: turns one candidate into a labeled suggestion set
//! - `SuggestionScheduler`: foreground/background work-ahead over all candidates
//! - `DisplayList`: the order-stable row list the scheduler fills
//! - The `SuggestionSource` and `DisplaySink` seams used by both

mod display;
mod resolver;
mod scheduler;

pub use display::{CandidateState, DisplayList, DisplayRow};
pub use resolver::{colorize_version_diff, SuggestionResolver};
pub use scheduler::{foreground_count, ScheduleOutcome, SuggestionScheduler};

use crate::domain::{DependencyCandidate, Resolution};
use async_trait::async_trait;

/// Produces the resolution of a single candidate
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn suggest(&self, candidate: &DependencyCandidate) -> Resolution;
}

/// Receives the display list every time it changes
pub trait DisplaySink: Send {
    /// Called after each mutation with the full row list
    fn render(&mut self, rows: &[DisplayRow]);

    /// Called once after compaction with the final rows
    fn finish(&mut self, _rows: &[DisplayRow]) {}
}

/// A sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DisplaySink for NullSink {
    fn render(&mut self, _rows: &[DisplayRow]) {}
}
