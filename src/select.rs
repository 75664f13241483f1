//! Folding the user's selection back into the workspaces
//!
//! Every declared entry whose identity has a chosen range gets that range,
//! in every workspace that declares it. The workspaces are updated in memory;
//! the outcome lists what changed.

use crate::domain::{CandidateId, DependencyKind, Selection, Workspace, WorkspaceIdent};
use serde::Serialize;
use tracing::debug;

/// One range replaced in one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedChange {
    pub workspace: WorkspaceIdent,
    pub name: String,
    pub kind: DependencyKind,
    pub from: String,
    pub to: String,
}

/// Result of applying a selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionOutcome {
    pub changes: Vec<AppliedChange>,
}

impl SelectionOutcome {
    /// Returns true if any manifest entry was modified
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Applies selections to workspace manifests
pub struct SelectionAggregator;

impl SelectionAggregator {
    /// Replace the declared range of every selected entry
    pub fn apply(workspaces: &mut [Workspace], selection: &Selection) -> SelectionOutcome {
        let mut outcome = SelectionOutcome::default();
        if selection.is_empty() {
            return outcome;
        }

        for workspace in workspaces.iter_mut() {
            for entry in workspace.dependencies.iter_mut() {
                let Some(chosen) = selection.chosen_range(&CandidateId::of_entry(entry)) else {
                    continue;
                };
                if chosen == entry.range {
                    continue;
                }

                debug!(
                    workspace = %workspace.ident,
                    name = %entry.name,
                    from = %entry.range,
                    to = chosen,
                    "applying selection"
                );
                let from = std::mem::replace(&mut entry.range, chosen.to_string());
                outcome.changes.push(AppliedChange {
                    workspace: workspace.ident.clone(),
                    name: entry.name.clone(),
                    kind: entry.kind,
                    from,
                    to: entry.range.clone(),
                });
            }
        }

        outcome
    }
}
