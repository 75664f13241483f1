//! Dependency candidates offered for upgrade

use super::{DependencyEntry, DependencyKind, WorkspaceIdent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity of a candidate: the descriptor `name@range`
///
/// Entries declared identically in several workspaces share one id, so a
/// single choice applies to all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    /// Creates the id for a name/range pair
    pub fn new(name: &str, range: &str) -> Self {
        Self(format!("{}@{}", name, range))
    }

    /// Returns the id of a declared entry
    pub fn of_entry(entry: &DependencyEntry) -> Self {
        Self::new(&entry.name, &entry.range)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable snapshot of one declared dependency under consideration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyCandidate {
    /// Fully qualified package name
    pub name: String,
    /// Range currently declared in the manifest
    pub current_range: String,
    /// Workspace that declared the entry
    pub workspace: WorkspaceIdent,
    /// Manifest section
    pub kind: DependencyKind,
    /// Correlation key
    pub id: CandidateId,
}

impl DependencyCandidate {
    /// Creates a candidate
    pub fn new(
        name: impl Into<String>,
        current_range: impl Into<String>,
        workspace: WorkspaceIdent,
        kind: DependencyKind,
    ) -> Self {
        let name = name.into();
        let current_range = current_range.into();
        let id = CandidateId::new(&name, &current_range);
        Self {
            name,
            current_range,
            workspace,
            kind,
            id,
        }
    }

    /// Snapshots a declared entry of the given workspace
    pub fn from_entry(entry: &DependencyEntry, workspace: &WorkspaceIdent) -> Self {
        Self::new(
            entry.name.clone(),
            entry.range.clone(),
            workspace.clone(),
            entry.kind,
        )
    }

    /// The descriptor string, used for ordering
    pub fn descriptor(&self) -> &str {
        self.id.as_str()
    }
}

impl fmt::Display for DependencyCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} of {})", self.id, self.kind, self.workspace)
    }
}
