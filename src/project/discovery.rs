//! Workspace directory discovery from `workspaces` globs
//!
//! Patterns are relative to the project root. A pattern starting with `!`
//! removes the directories it matches. Only directories holding a
//! package.json are returned; `node_modules` is never searched.

use super::package_json::MANIFEST_FILENAME;
use crate::error::ManifestError;
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Expand workspace patterns into sorted, deduplicated workspace directories
pub fn discover_workspace_dirs(
    root: &Path,
    patterns: &[String],
) -> Result<Vec<PathBuf>, ManifestError> {
    let manifest_path = root.join(MANIFEST_FILENAME);
    let invalid = |pattern: &str, message: String| ManifestError::InvalidWorkspacePattern {
        path: manifest_path.clone(),
        pattern: pattern.to_string(),
        message,
    };

    let mut negations = Vec::new();
    let mut inclusions = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(negated) => negations.push(
                Pattern::new(trim_relative(negated))
                    .map_err(|e| invalid(pattern, e.to_string()))?,
            ),
            None => inclusions.push(pattern.as_str()),
        }
    }

    let mut dirs = BTreeSet::new();
    for pattern in inclusions {
        let full = root.join(trim_relative(pattern));
        let full = full
            .to_str()
            .ok_or_else(|| invalid(pattern, "invalid UTF-8 in pattern".to_string()))?;

        let entries = glob::glob(full).map_err(|e| invalid(pattern, e.to_string()))?;
        for entry in entries.filter_map(Result::ok) {
            if !entry.is_dir() || !entry.join(MANIFEST_FILENAME).is_file() {
                continue;
            }
            let relative = entry.strip_prefix(root).unwrap_or(&entry);
            if relative
                .components()
                .any(|c| c.as_os_str() == "node_modules")
            {
                continue;
            }
            if negations.iter().any(|neg| neg.matches_path(relative)) {
                trace!(dir = %relative.display(), "workspace excluded by negated pattern");
                continue;
            }
            dirs.insert(entry);
        }
    }

    Ok(dirs.into_iter().collect())
}

fn trim_relative(pattern: &str) -> &str {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    pattern.trim_end_matches('/')
}
