//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the run status
//! - Applied changes with their semantic change type

use crate::orchestrator::{OrchestratorResult, RunStatus};
use crate::output::text::VersionChangeType;
use crate::output::OutputFormatter;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput {
    /// `no_candidates`, `up_to_date`, `cancelled` or `applied`
    status: &'static str,
    /// Whether any manifest entry changed
    changed: bool,
    /// Candidates after filtering
    candidates: usize,
    /// Candidates offered with an upgrade
    offered: usize,
    changes: Vec<JsonChange>,
}

/// JSON representation of one applied change
#[derive(Serialize)]
struct JsonChange {
    workspace: String,
    name: String,
    /// `dependencies` or `devDependencies`
    kind: &'static str,
    from: String,
    to: String,
    /// `major`, `minor`, `patch` or `?`
    change: &'static str,
}

impl JsonOutput {
    fn from_result(result: &OrchestratorResult) -> Self {
        let (status, changes) = match &result.status {
            RunStatus::NoCandidates => ("no_candidates", Vec::new()),
            RunStatus::UpToDate => ("up_to_date", Vec::new()),
            RunStatus::Cancelled => ("cancelled", Vec::new()),
            RunStatus::Applied(outcome) => (
                "applied",
                outcome
                    .changes
                    .iter()
                    .map(|c| JsonChange {
                        workspace: c.workspace.to_string(),
                        name: c.name.clone(),
                        kind: c.kind.manifest_key(),
                        from: c.from.clone(),
                        to: c.to.clone(),
                        change: VersionChangeType::from_ranges(&c.from, &c.to).label(),
                    })
                    .collect(),
            ),
        };

        Self {
            status,
            changed: result.changed(),
            candidates: result.candidates,
            offered: result.offered,
            changes,
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput::from_result(result);
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
