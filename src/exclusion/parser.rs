//! Parser for the exclusion mini-language
//!
//! Grammar per comma-separated token:
//! `[<location>#]<namePattern>[@<versionConstraint>]`
//!
//! - a location containing `@` is a workspace identifier, otherwise a directory
//! - a leading `@` on the name is a package scope, not a version separator
//! - an `npm:` prefix on the version constraint is stripped

use crate::error::ExclusionError;
use std::fmt;
use std::str::FromStr;

const NPM_PROTOCOL: &str = "npm:";

/// One parsed exclusion token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    /// Exact workspace identifier the rule is limited to
    pub workspace_scope: Option<String>,
    /// Exact directory the rule is limited to
    pub directory_scope: Option<String>,
    /// Glob matched against the fully qualified dependency name
    pub name_pattern: String,
    /// Semver range or glob matched against the declared range
    pub version_constraint: Option<String>,
}

impl ExclusionRule {
    /// A rule matching a name pattern everywhere, at any version
    pub fn name(pattern: impl Into<String>) -> Self {
        Self {
            workspace_scope: None,
            directory_scope: None,
            name_pattern: pattern.into(),
            version_constraint: None,
        }
    }

    /// Parses a single, already trimmed, token
    pub fn parse(token: &str) -> Result<Self, ExclusionError> {
        let segments: Vec<&str> = token.split('#').collect();
        let (location, dependency) = match segments.as_slice() {
            [dependency] => (None, *dependency),
            [location, dependency] => (Some(*location), *dependency),
            _ => return Err(ExclusionError::invalid_format(token)),
        };

        let (workspace_scope, directory_scope) = match location {
            Some(location) if location.contains('@') => (Some(location.to_string()), None),
            Some(location) => (None, Some(location.to_string())),
            None => (None, None),
        };

        let parts: Vec<&str> = dependency.split('@').collect();
        let (name_pattern, version_constraint) = match parts.as_slice() {
            [name] => (name.to_string(), None),
            ["", scoped] => (format!("@{}", scoped), None),
            [name, version] => (name.to_string(), Some(*version)),
            [_, scoped, version] => (format!("@{}", scoped), Some(*version)),
            _ => return Err(ExclusionError::invalid_format(token)),
        };

        let version_constraint = version_constraint
            .map(|v| v.strip_prefix(NPM_PROTOCOL).unwrap_or(v).to_string());

        Ok(Self {
            workspace_scope,
            directory_scope,
            name_pattern,
            version_constraint,
        })
    }

    /// Returns true if the rule is limited to a workspace or directory
    pub fn is_scoped(&self) -> bool {
        self.workspace_scope.is_some() || self.directory_scope.is_some()
    }
}

impl FromStr for ExclusionRule {
    type Err = ExclusionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim())
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.workspace_scope.as_ref().or(self.directory_scope.as_ref()) {
            write!(f, "{}#", location)?;
        }
        write!(f, "{}", self.name_pattern)?;
        if let Some(version) = &self.version_constraint {
            write!(f, "@{}", version)?;
        }
        Ok(())
    }
}

/// Parse a comma-separated exclusion argument into rules, in order
///
/// Tokens are trimmed and empty tokens are ignored. The first malformed token
/// aborts parsing.
pub fn parse_exclusions(raw: &str) -> Result<Vec<ExclusionRule>, ExclusionError> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ExclusionRule::parse)
        .collect()
}
