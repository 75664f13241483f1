//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Applied changes grouped by workspace, with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Development dependency marking
//! - Summary line per run status

use crate::domain::DependencyKind;
use crate::orchestrator::{OrchestratorResult, RunStatus};
use crate::output::{OutputFormatter, Verbosity};
use crate::select::AppliedChange;
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two declared ranges
    pub fn from_ranges(old: &str, new: &str) -> Self {
        let parse = |range: &str| -> Option<(u64, u64)> {
            let v = range.trim_start_matches(['^', '~', '=', 'v']);
            let mut parts = v.split(['.', '-']);
            let major = parts.next()?.parse().ok()?;
            let minor = parts.next().and_then(|p| p.parse().ok()).unwrap_or(0);
            Some((major, minor))
        };

        match (parse(old), parse(new)) {
            (Some((old_major, old_minor)), Some((new_major, new_minor))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Format a single change line
    fn format_change_line(
        &self,
        change: &AppliedChange,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let change_type = VersionChangeType::from_ranges(&change.from, &change.to);
        let is_dev = change.kind == DependencyKind::DevDependencies;

        if self.color {
            let name_display = format!("{:width$}", change.name, width = max_name_len);
            let dev_display = if is_dev {
                " (dev)".dimmed().to_string()
            } else {
                String::new()
            };
            writeln!(
                writer,
                "    {} {} {} {} [{}]{}",
                name_display,
                change.from.dimmed(),
                "→".dimmed(),
                change.to.bright_white().bold(),
                change_type.colored_label(),
                dev_display
            )
        } else {
            writeln!(
                writer,
                "    {:width$} {} -> {} [{}]{}",
                change.name,
                change.from,
                change.to,
                change_type.label(),
                if is_dev { " (dev)" } else { "" },
                width = max_name_len
            )
        }
    }

    fn format_changes(
        &self,
        changes: &[AppliedChange],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let max_name_len = changes.iter().map(|c| c.name.len()).max().unwrap_or(0);

        let mut current_workspace = None;
        for change in changes {
            if current_workspace != Some(&change.workspace) {
                let header = change.workspace.to_string();
                if self.color {
                    writeln!(writer, "  {}", header.cyan().bold())?;
                } else {
                    writeln!(writer, "  {}", header)?;
                }
                current_workspace = Some(&change.workspace);
            }
            self.format_change_line(change, max_name_len, writer)?;
        }
        Ok(())
    }

    fn status_line(&self, result: &OrchestratorResult) -> String {
        match &result.status {
            RunStatus::NoCandidates => "No dependencies to upgrade".to_string(),
            RunStatus::UpToDate => format!(
                "All {} dependencies are up to date",
                result.candidates
            ),
            RunStatus::Cancelled => "Cancelled".to_string(),
            RunStatus::Applied(outcome) if !outcome.changed() => {
                "No upgrades selected".to_string()
            }
            RunStatus::Applied(outcome) => {
                let mut workspaces: Vec<_> =
                    outcome.changes.iter().map(|c| &c.workspace).collect();
                workspaces.dedup();
                format!(
                    "{} entr{} updated in {} workspace(s)",
                    outcome.changes.len(),
                    if outcome.changes.len() == 1 { "y" } else { "ies" },
                    workspaces.len()
                )
            }
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let status = self.status_line(result);
        let changed = result.changed();

        if self.color {
            let status = if changed {
                status.green().to_string()
            } else {
                status.dimmed().to_string()
            };
            writeln!(writer, "{}", status)?;
        } else {
            writeln!(writer, "{}", status)?;
        }

        if self.verbosity == Verbosity::Quiet {
            return Ok(());
        }

        if let RunStatus::Applied(outcome) = &result.status {
            self.format_changes(&outcome.changes, writer)?;
        }

        if self.verbosity == Verbosity::Verbose {
            writeln!(
                writer,
                "  {} candidate(s), {} offered",
                result.candidates, result.offered
            )?;
        }

        Ok(())
    }
}
