//! Suggestion resolution for a single candidate
//!
//! Two oracle queries run concurrently: the range compatible with the declared
//! one, and the `latest` tag. Their results are turned into the three options
//! (current, compatible, latest) with colorized labels.

use super::SuggestionSource;
use crate::domain::{DependencyCandidate, Resolution, SuggestionOption, SuggestionSet};
use crate::range::{is_concrete_version, RangeModifier};
use crate::registry::{VersionOracle, LATEST_TAG};
use async_trait::async_trait;
use colored::Colorize;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::debug;

/// `[modifier]major.minor.patch[-prerelease]`
static SIMPLE_SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([\^~]?)(\d+)(\.\d+)(\.\d+)(-[0-9A-Za-z.-]+)?$").unwrap()
});

/// Resolves suggestion sets through a version oracle
#[derive(Clone)]
pub struct SuggestionResolver {
    oracle: Arc<dyn VersionOracle>,
    color: bool,
}

impl SuggestionResolver {
    /// Create a resolver with colorized labels
    pub fn new(oracle: Arc<dyn VersionOracle>) -> Self {
        Self {
            oracle,
            color: true,
        }
    }

    /// Enable or disable label colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Resolve the suggestion set of a candidate
    pub async fn resolve(&self, candidate: &DependencyCandidate) -> Resolution {
        let current = candidate.current_range.as_str();
        let modifier = RangeModifier::of(current);

        let compatible_query = if is_concrete_version(current) {
            format!("^{}", current)
        } else {
            current.to_string()
        };

        let (compatible, latest) = tokio::join!(
            self.query(candidate, &compatible_query, modifier),
            self.query(candidate, LATEST_TAG, modifier),
        );

        let mut options = [
            SuggestionOption::current(current),
            SuggestionOption::empty(),
            SuggestionOption::empty(),
        ];

        if let Some(range) = compatible.as_deref().filter(|r| *r != current) {
            options[SuggestionSet::COMPATIBLE] =
                SuggestionOption::upgrade(range, self.label(current, range));
        }

        if let Some(range) = latest
            .as_deref()
            .filter(|r| *r != current && Some(*r) != compatible.as_deref())
        {
            options[SuggestionSet::LATEST] =
                SuggestionOption::upgrade(range, self.label(current, range));
        }

        let resolution = Resolution::from_set(SuggestionSet::new(candidate.clone(), options));
        if resolution.is_dropped() {
            debug!(candidate = %candidate.id, "no upgrade available");
        }
        resolution
    }

    /// Run one oracle query; failures mean "no suggestion" for the slot
    async fn query(
        &self,
        candidate: &DependencyCandidate,
        range: &str,
        modifier: RangeModifier,
    ) -> Option<String> {
        match self.oracle.resolve(&candidate.name, range).await {
            Ok(Some(version)) => Some(modifier.apply(&version)),
            Ok(None) => Some(candidate.current_range.clone()),
            Err(e) => {
                debug!(
                    package = %candidate.name,
                    range,
                    registry = self.oracle.registry_name(),
                    error = %e,
                    "oracle query failed"
                );
                None
            }
        }
    }

    fn label(&self, from: &str, to: &str) -> String {
        if self.color {
            colorize_version_diff(from, to)
        } else {
            to.to_string()
        }
    }
}

#[async_trait]
impl SuggestionSource for SuggestionResolver {
    async fn suggest(&self, candidate: &DependencyCandidate) -> Resolution {
        self.resolve(candidate).await
    }
}

/// Paint `to` from its first semver part that differs from `from`
///
/// Parts are modifier, major, minor, patch and prerelease, painted gray, red,
/// yellow, green and magenta. Ranges that are not simple versions are returned
/// unpainted.
pub fn colorize_version_diff(from: &str, to: &str) -> String {
    let (Some(old), Some(new)) = (SIMPLE_SEMVER_RE.captures(from), SIMPLE_SEMVER_RE.captures(to))
    else {
        return to.to_string();
    };

    let part = |caps: &regex::Captures<'_>, i: usize| {
        caps.get(i + 1).map_or("", |m| m.as_str()).to_string()
    };
    let old_parts: Vec<String> = (0..5).map(|i| part(&old, i)).collect();
    let new_parts: Vec<String> = (0..5).map(|i| part(&new, i)).collect();

    let Some(first_diff) = (0..5).find(|&i| old_parts[i] != new_parts[i]) else {
        return to.to_string();
    };

    let unchanged = new_parts[..first_diff].concat();
    let changed = new_parts[first_diff..].concat();
    let painted = match first_diff {
        0 => changed.bright_black(),
        1 => changed.red(),
        2 => changed.yellow(),
        3 => changed.green(),
        _ => changed.magenta(),
    };
    format!("{}{}", unchanged, painted)
}
