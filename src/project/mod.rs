//! Project access: workspaces, scope restriction and candidate collection
//!
//! This module provides:
//! - The `Project` trait over a set of workspaces
//! - `NodeProject`, loaded from a root package.json and its `workspaces` globs
//! - Workspace selection by name
//! - Candidate collection: exclusion filtering, deduplication and ordering

mod discovery;
mod node;
mod package_json;

pub use discovery::discover_workspace_dirs;
pub use node::NodeProject;
pub use package_json::{PackageManifest, WorkspacesField, MANIFEST_FILENAME};

use crate::domain::{DependencyCandidate, Workspace};
use crate::error::WorkspaceError;
use crate::exclusion::ExclusionMatcher;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, trace};

/// A set of workspaces and their declared dependencies
pub trait Project {
    /// Project root directory
    fn root(&self) -> &Path;

    /// All workspaces, root first
    fn workspaces(&self) -> &[Workspace];

    /// Mutable access used to write selections back
    fn workspaces_mut(&mut self) -> &mut [Workspace];

    /// Returns true if `name` is a workspace of this project
    fn is_workspace_dependency(&self, name: &str) -> bool;
}

/// Resolve workspace names to workspaces; no names means every workspace
pub fn select_workspaces<'a, P: Project + ?Sized>(
    project: &'a P,
    names: &[String],
) -> Result<Vec<&'a Workspace>, WorkspaceError> {
    if names.is_empty() {
        return Ok(project.workspaces().iter().collect());
    }

    names
        .iter()
        .map(|name| {
            project
                .workspaces()
                .iter()
                .find(|w| w.ident.to_string() == *name)
                .ok_or_else(|| WorkspaceError::unknown(name))
        })
        .collect()
}

/// Returns true if the range is resolved through the registry
///
/// Protocol ranges (`workspace:`, `file:`, `git+https:`, `npm:` aliases) and
/// `owner/repo` shorthands are not.
pub fn is_registry_range(range: &str) -> bool {
    !range.contains(':') && !range.contains('/')
}

/// Collect the candidates offered for upgrade
///
/// Every (workspace, entry) pair that is a registry dependency, not an
/// in-project workspace and not excluded becomes a candidate. Candidates
/// sharing an id are offered once; the result is sorted by descriptor.
pub fn collect_candidates<P: Project + ?Sized>(
    project: &P,
    workspaces: &[&Workspace],
    matcher: &ExclusionMatcher,
    cwd: &Path,
) -> Vec<DependencyCandidate> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for workspace in workspaces {
        for entry in &workspace.dependencies {
            if project.is_workspace_dependency(&entry.name) || !is_registry_range(&entry.range) {
                trace!(name = %entry.name, range = %entry.range, "skipping non-registry entry");
                continue;
            }

            let candidate = DependencyCandidate::from_entry(entry, &workspace.ident);
            if matcher.is_excluded(&candidate, cwd) {
                trace!(candidate = %candidate, "excluded");
                continue;
            }
            if seen.insert(candidate.id.clone()) {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| a.descriptor().cmp(b.descriptor()));
    debug!(count = candidates.len(), "collected candidates");
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencyKind, WorkspaceIdent};

    fn project() -> NodeProject {
        NodeProject::from_parts(
            "/repo",
            vec![
                Workspace::new(WorkspaceIdent::new("mono"), "/repo")
                    .with_dependency("typescript", "~5.4.0", DependencyKind::DevDependencies)
                    .with_dependency("react", "^18.2.0", DependencyKind::Dependencies),
                Workspace::new(WorkspaceIdent::scoped("mx", "app"), "/repo/packages/app")
                    .with_dependency("react", "^18.2.0", DependencyKind::Dependencies)
                    .with_dependency("@mx/ui", "workspace:^", DependencyKind::Dependencies)
                    .with_dependency("@types/react", "^18.0.0", DependencyKind::DevDependencies)
                    .with_dependency("lib", "github:org/lib", DependencyKind::Dependencies),
                Workspace::new(WorkspaceIdent::scoped("mx", "ui"), "/repo/packages/ui")
                    .with_dependency("@mx/app", "1.0.0", DependencyKind::DevDependencies),
            ],
            None,
        )
    }

    fn ids(candidates: &[DependencyCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.descriptor()).collect()
    }

    #[test]
    fn test_select_all_workspaces_by_default() {
        let project = project();
        assert_eq!(select_workspaces(&project, &[]).unwrap().len(), 3);
    }

    #[test]
    fn test_select_named_workspaces() {
        let project = project();
        let selected = select_workspaces(&project, &["@mx/app".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].ident.to_string(), "@mx/app");
    }

    #[test]
    fn test_select_unknown_workspace() {
        let project = project();
        let err = select_workspaces(&project, &["@mx/app".to_string(), "docs".to_string()])
            .unwrap_err();
        assert_eq!(err, WorkspaceError::unknown("docs"));
    }

    #[test]
    fn test_collect_dedupes_skips_and_sorts() {
        let project = project();
        let all = select_workspaces(&project, &[]).unwrap();
        let candidates = collect_candidates(
            &project,
            &all,
            &ExclusionMatcher::default(),
            Path::new("/repo"),
        );

        assert_eq!(
            ids(&candidates),
            vec!["@types/react@^18.0.0", "react@^18.2.0", "typescript@~5.4.0"]
        );
        // First declaring workspace wins
        assert_eq!(candidates[1].workspace.to_string(), "mono");
    }

    #[test]
    fn test_collect_applies_exclusions() {
        let project = project();
        let all = select_workspaces(&project, &[]).unwrap();
        let matcher = ExclusionMatcher::from_spec("react,@types/*").unwrap();
        let candidates = collect_candidates(&project, &all, &matcher, Path::new("/repo"));

        assert_eq!(ids(&candidates), vec!["typescript@~5.4.0"]);
    }

    #[test]
    fn test_is_registry_range() {
        assert!(is_registry_range("^18.2.0"));
        assert!(is_registry_range("latest"));
        assert!(is_registry_range(">=1.0.0 <2.0.0"));
        assert!(!is_registry_range("workspace:^"));
        assert!(!is_registry_range("npm:react@^18"));
        assert!(!is_registry_range("file:../lib"));
        assert!(!is_registry_range("org/lib"));
    }
}
