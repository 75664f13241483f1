//! Node.js project loaded from disk

use super::discovery::discover_workspace_dirs;
use super::package_json::{PackageManifest, MANIFEST_FILENAME};
use super::Project;
use crate::domain::{Workspace, WorkspaceIdent};
use crate::error::ManifestError;
use serde_json::Value;
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A root package.json and the workspaces it declares
#[derive(Debug, Clone)]
pub struct NodeProject {
    root: PathBuf,
    workspaces: Vec<Workspace>,
    workspace_names: HashSet<String>,
    settings: Option<Value>,
}

impl NodeProject {
    /// Canonicalize the directory the project is loaded from
    pub fn locate_root(cwd: &Path) -> Result<PathBuf, ManifestError> {
        cwd.canonicalize().map_err(|e| {
            let path = cwd.join(MANIFEST_FILENAME);
            match e.kind() {
                ErrorKind::NotFound => ManifestError::not_found(path),
                _ => ManifestError::read_error(path, e),
            }
        })
    }

    /// Load the project rooted at `root`
    ///
    /// The root manifest is always the first workspace, followed by the
    /// declared workspaces in path order.
    pub fn load(root: &Path) -> Result<Self, ManifestError> {
        let manifest = PackageManifest::read_from_dir(root)?;
        let mut workspaces = vec![workspace_from_manifest(root, &manifest)];

        for dir in discover_workspace_dirs(root, manifest.workspace_patterns())? {
            let member = PackageManifest::read_from_dir(&dir)?;
            workspaces.push(workspace_from_manifest(&dir, &member));
        }

        debug!(
            root = %root.display(),
            workspaces = workspaces.len(),
            "loaded project"
        );

        Ok(Self::from_parts(root, workspaces, manifest.upgrade_interactive))
    }

    /// Build a project from already loaded workspaces
    pub fn from_parts(
        root: impl Into<PathBuf>,
        workspaces: Vec<Workspace>,
        settings: Option<Value>,
    ) -> Self {
        let workspace_names = workspaces.iter().map(|w| w.ident.to_string()).collect();
        Self {
            root: root.into(),
            workspaces,
            workspace_names,
            settings,
        }
    }

    /// Raw `upgradeInteractive` value of the root manifest
    pub fn settings(&self) -> Option<&Value> {
        self.settings.as_ref()
    }
}

impl Project for NodeProject {
    fn root(&self) -> &Path {
        &self.root
    }

    fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    fn workspaces_mut(&mut self) -> &mut [Workspace] {
        &mut self.workspaces
    }

    fn is_workspace_dependency(&self, name: &str) -> bool {
        self.workspace_names.contains(name)
    }
}

/// Unnamed manifests are identified by their directory name
fn workspace_from_manifest(dir: &Path, manifest: &PackageManifest) -> Workspace {
    let ident = match &manifest.name {
        Some(name) => WorkspaceIdent::parse(name),
        None => WorkspaceIdent::new(
            dir.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string()),
        ),
    };

    let mut workspace = Workspace::new(ident, dir);
    workspace.dependencies = manifest.entries();
    workspace
}
