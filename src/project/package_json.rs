//! package.json manifest reading
//!
//! Handles:
//! - name (workspace identity)
//! - dependencies
//! - devDependencies
//! - workspaces (array form or `{ "packages": [...] }`)
//! - upgradeInteractive (project settings, kept raw)

use crate::domain::{DependencyEntry, DependencyKind};
use crate::error::ManifestError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Manifest file name
pub const MANIFEST_FILENAME: &str = "package.json";

/// The `workspaces` field of a root manifest
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WorkspacesField {
    Patterns(Vec<String>),
    Object {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl WorkspacesField {
    pub fn patterns(&self) -> &[String] {
        match self {
            WorkspacesField::Patterns(patterns) => patterns,
            WorkspacesField::Object { packages } => packages,
        }
    }
}

/// The parts of a package.json this tool reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Map<String, Value>,
    #[serde(default)]
    pub dev_dependencies: Map<String, Value>,
    pub workspaces: Option<WorkspacesField>,
    pub upgrade_interactive: Option<Value>,
}

impl PackageManifest {
    /// Parse manifest content; `path` is only used for error context
    pub fn parse(content: &str, path: &Path) -> Result<Self, ManifestError> {
        serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))
    }

    /// Read and parse the manifest in `dir`
    pub fn read_from_dir(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILENAME);
        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ManifestError::not_found(&path),
            _ => ManifestError::read_error(&path, e),
        })?;
        Self::parse(&content, &path)
    }

    /// Declared entries, dependencies first, each section in manifest order
    ///
    /// Non-string values are ignored.
    pub fn entries(&self) -> Vec<DependencyEntry> {
        let mut entries = Vec::new();
        for kind in DependencyKind::all() {
            let section = match kind {
                DependencyKind::Dependencies => &self.dependencies,
                DependencyKind::DevDependencies => &self.dev_dependencies,
            };
            for (name, range) in section {
                if let Some(range) = range.as_str() {
                    entries.push(DependencyEntry::new(name.clone(), range, *kind));
                }
            }
        }
        entries
    }

    pub fn workspace_patterns(&self) -> &[String] {
        self.workspaces
            .as_ref()
            .map(WorkspacesField::patterns)
            .unwrap_or_default()
    }
}
