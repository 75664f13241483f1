//! Foreground/background scheduling of suggestion resolution
//!
//! The first `ceil(viewport * 1.75)` candidates are resolved one at a time
//! (foreground) so the visible rows fill in order. The rest are resolved in
//! groups of `viewport` concurrent queries (background); a group commits as a
//! whole, and never before the foreground is done. All commits go through a
//! single-consumer queue that owns the display list.

use super::{DisplayList, DisplaySink, SuggestionSource};
use crate::domain::{DependencyCandidate, Resolution, SuggestionSet};
use futures::future::join_all;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Number of candidates resolved in the foreground for a viewport size
pub fn foreground_count(viewport_size: usize) -> usize {
    (viewport_size * 7).div_ceil(4)
}

/// Result of a scheduling run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Compacted list of suggestion sets, in display order
    Completed(Vec<SuggestionSet>),
    /// The run was cancelled; the display was left as it was
    Cancelled,
}

enum Event {
    Started(usize),
    Resolved(usize, Resolution),
    ForegroundDone,
    GroupResolved(Vec<(usize, Resolution)>),
}

/// Drives a suggestion source over a candidate list
pub struct SuggestionScheduler<S> {
    source: S,
    viewport_size: usize,
}

impl<S: SuggestionSource> SuggestionScheduler<S> {
    /// Create a scheduler; a zero viewport is treated as one row
    pub fn new(source: S, viewport_size: usize) -> Self {
        Self {
            source,
            viewport_size: viewport_size.max(1),
        }
    }

    pub fn viewport_size(&self) -> usize {
        self.viewport_size
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Resolve every candidate, pushing display updates to `sink`
    pub async fn run(
        &self,
        candidates: &[DependencyCandidate],
        sink: &mut dyn DisplaySink,
        cancel: &CancellationToken,
    ) -> ScheduleOutcome {
        if cancel.is_cancelled() {
            return ScheduleOutcome::Cancelled;
        }

        let split = foreground_count(self.viewport_size).min(candidates.len());
        debug!(
            total = candidates.len(),
            foreground = split,
            viewport = self.viewport_size,
            "scheduling suggestions"
        );

        let (tx, rx) = mpsc::unbounded_channel();
        let foreground = self.foreground(&candidates[..split], tx.clone());
        let background = self.background(&candidates[split..], split, tx);
        let consumer = consume(DisplayList::new(candidates.len()), rx, sink);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("suggestion scheduling cancelled");
                ScheduleOutcome::Cancelled
            }
            (_, _, list) = async { tokio::join!(foreground, background, consumer) } => {
                ScheduleOutcome::Completed(list.into_sets())
            }
        }
    }

    async fn foreground(
        &self,
        candidates: &[DependencyCandidate],
        tx: mpsc::UnboundedSender<Event>,
    ) {
        for (index, candidate) in candidates.iter().enumerate() {
            let _ = tx.send(Event::Started(index));
            let resolution = self.source.suggest(candidate).await;
            let _ = tx.send(Event::Resolved(index, resolution));
        }
        let _ = tx.send(Event::ForegroundDone);
    }

    async fn background(
        &self,
        candidates: &[DependencyCandidate],
        offset: usize,
        tx: mpsc::UnboundedSender<Event>,
    ) {
        for (group_index, group) in candidates.chunks(self.viewport_size).enumerate() {
            let first = offset + group_index * self.viewport_size;
            for index in first..first + group.len() {
                let _ = tx.send(Event::Started(index));
            }

            let resolutions = join_all(group.iter().map(|c| self.source.suggest(c))).await;
            let indexed = (first..).zip(resolutions).collect();
            let _ = tx.send(Event::GroupResolved(indexed));
        }
    }
}

/// Apply events to the display list until every producer is done
async fn consume(
    mut list: DisplayList,
    mut rx: mpsc::UnboundedReceiver<Event>,
    sink: &mut dyn DisplaySink,
) -> DisplayList {
    sink.render(list.rows());

    let mut foreground_done = false;
    let mut deferred: Vec<Vec<(usize, Resolution)>> = Vec::new();

    while let Some(event) = rx.recv().await {
        match event {
            Event::Started(index) => {
                trace!(index, "resolution started");
                list.mark_loading(index);
            }
            Event::Resolved(index, resolution) => {
                if list.fill(index, resolution) {
                    sink.render(list.rows());
                }
            }
            Event::ForegroundDone => {
                foreground_done = true;
                for group in deferred.drain(..) {
                    commit_group(&mut list, group, sink);
                }
            }
            Event::GroupResolved(group) if foreground_done => {
                commit_group(&mut list, group, sink);
            }
            Event::GroupResolved(group) => {
                trace!(size = group.len(), "deferring background group");
                deferred.push(group);
            }
        }
    }

    for group in deferred {
        commit_group(&mut list, group, sink);
    }

    list.compact();
    sink.finish(list.rows());
    list
}

fn commit_group(list: &mut DisplayList, group: Vec<(usize, Resolution)>, sink: &mut dyn DisplaySink) {
    let size = group.len();
    let filled = list.splice(group);
    debug!(size, filled, cursor = list.cursor(), "committed background group");
    if filled > 0 {
        sink.render(list.rows());
    }
}
