//! Workspace identifiers and declared dependency entries

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Fully qualified workspace identifier (`@scope/name` or bare `name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceIdent {
    /// Scope without the leading `@`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Package name without the scope
    pub name: String,
}

impl WorkspaceIdent {
    /// Creates an unscoped identifier
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            scope: None,
            name: name.into(),
        }
    }

    /// Creates a scoped identifier
    pub fn scoped(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: Some(scope.into()),
            name: name.into(),
        }
    }

    /// Parses a package name as written in a manifest (`@scope/name` or `name`)
    pub fn parse(full_name: &str) -> Self {
        if let Some(rest) = full_name.strip_prefix('@') {
            if let Some((scope, name)) = rest.split_once('/') {
                return Self::scoped(scope, name);
            }
        }
        Self::new(full_name)
    }
}

impl fmt::Display for WorkspaceIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            Some(scope) => write!(f, "@{}/{}", scope, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Which manifest section a dependency is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    /// `dependencies`
    Dependencies,
    /// `devDependencies`
    DevDependencies,
}

impl DependencyKind {
    /// Returns the manifest key for this kind
    pub fn manifest_key(&self) -> &'static str {
        match self {
            DependencyKind::Dependencies => "dependencies",
            DependencyKind::DevDependencies => "devDependencies",
        }
    }

    /// Returns all kinds considered for upgrades, in manifest order
    pub fn all() -> &'static [DependencyKind] {
        &[DependencyKind::Dependencies, DependencyKind::DevDependencies]
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.manifest_key())
    }
}

/// A dependency as declared in a workspace manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEntry {
    /// Fully qualified package name
    pub name: String,
    /// Declared range
    pub range: String,
    /// Manifest section
    pub kind: DependencyKind,
}

impl DependencyEntry {
    pub fn new(name: impl Into<String>, range: impl Into<String>, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
            kind,
        }
    }
}

/// A workspace of the project with its declared dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Workspace identifier
    pub ident: WorkspaceIdent,
    /// Directory containing the workspace manifest
    pub cwd: PathBuf,
    /// Declared entries, in manifest order
    pub dependencies: Vec<DependencyEntry>,
}

impl Workspace {
    /// Creates a workspace with no dependencies
    pub fn new(ident: WorkspaceIdent, cwd: impl Into<PathBuf>) -> Self {
        Self {
            ident,
            cwd: cwd.into(),
            dependencies: Vec::new(),
        }
    }

    /// Adds a dependency entry (builder pattern)
    pub fn with_dependency(
        mut self,
        name: impl Into<String>,
        range: impl Into<String>,
        kind: DependencyKind,
    ) -> Self {
        self.dependencies.push(DependencyEntry::new(name, range, kind));
        self
    }

    /// Looks up a declared entry
    pub fn dependency(&self, name: &str, kind: DependencyKind) -> Option<&DependencyEntry> {
        self.dependencies
            .iter()
            .find(|entry| entry.name == name && entry.kind == kind)
    }
}
