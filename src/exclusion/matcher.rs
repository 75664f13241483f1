//! Exclusion matching
//!
//! A candidate is excluded when any rule matches its name, its location and
//! its declared range at the same time.

use super::{ExclusionRule, Glob};
use crate::domain::DependencyCandidate;
use crate::error::ExclusionError;
use crate::range::{parse_version, NpmRange};
use std::path::Path;

/// How a rule's version constraint is checked
#[derive(Debug, Clone)]
enum VersionPredicate {
    /// The constraint is a semver range; the glob is used when the declared
    /// range is not a concrete version
    Range { range: NpmRange, fallback: Glob },
    /// The constraint is not a semver range
    Glob(Glob),
}

impl VersionPredicate {
    fn new(constraint: &str) -> Result<Self, ExclusionError> {
        let glob = Glob::new(constraint)?;
        Ok(match NpmRange::parse(constraint) {
            Some(range) => VersionPredicate::Range {
                range,
                fallback: glob,
            },
            None => VersionPredicate::Glob(glob),
        })
    }

    fn is_match(&self, current_range: &str) -> bool {
        match self {
            VersionPredicate::Range { range, fallback } => match parse_version(current_range) {
                Some(version) => range.matches(&version),
                None => fallback.is_match(current_range),
            },
            VersionPredicate::Glob(glob) => glob.is_match(current_range),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledRule {
    rule: ExclusionRule,
    name: Glob,
    version: Option<VersionPredicate>,
}

impl CompiledRule {
    fn compile(rule: ExclusionRule) -> Result<Self, ExclusionError> {
        let name = Glob::new(&rule.name_pattern)?;
        let version = rule
            .version_constraint
            .as_deref()
            .map(VersionPredicate::new)
            .transpose()?;
        Ok(Self {
            rule,
            name,
            version,
        })
    }

    fn matches(&self, candidate: &DependencyCandidate, cwd: &Path) -> bool {
        self.name.is_match(&candidate.name)
            && self.location_matches(candidate, cwd)
            && self
                .version
                .as_ref()
                .is_none_or(|predicate| predicate.is_match(&candidate.current_range))
    }

    fn location_matches(&self, candidate: &DependencyCandidate, cwd: &Path) -> bool {
        if !self.rule.is_scoped() {
            return true;
        }
        let workspace_match = self
            .rule
            .workspace_scope
            .as_deref()
            .is_some_and(|scope| scope == candidate.workspace.to_string());
        // Directory scopes compare against the invocation directory, not the
        // directory of the workspace declaring the dependency.
        let directory_match = self
            .rule
            .directory_scope
            .as_deref()
            .is_some_and(|dir| Path::new(dir) == cwd);
        workspace_match || directory_match
    }
}

/// Evaluates candidates against a set of exclusion rules
#[derive(Debug, Clone, Default)]
pub struct ExclusionMatcher {
    rules: Vec<CompiledRule>,
}

impl ExclusionMatcher {
    /// Compile a matcher from parsed rules
    pub fn new(rules: Vec<ExclusionRule>) -> Result<Self, ExclusionError> {
        let rules = rules
            .into_iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Parse and compile a comma-separated exclusion argument
    pub fn from_spec(raw: &str) -> Result<Self, ExclusionError> {
        Self::new(super::parse_exclusions(raw)?)
    }

    /// Returns true if any rule matches the candidate
    pub fn is_excluded(&self, candidate: &DependencyCandidate, cwd: &Path) -> bool {
        self.rules.iter().any(|rule| rule.matches(candidate, cwd))
    }

    /// The first rule matching the candidate, for diagnostics
    pub fn matching_rule(&self, candidate: &DependencyCandidate, cwd: &Path) -> Option<&ExclusionRule> {
        self.rules
            .iter()
            .find(|rule| rule.matches(candidate, cwd))
            .map(|rule| &rule.rule)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
