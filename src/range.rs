//! npm-style version and range helpers on top of the `semver` crate
//!
//! The `semver` crate speaks Cargo's requirement syntax. npm ranges differ in
//! a few places that matter here:
//! - a bare version (`1.2.3`) is an exact pin, not a caret requirement
//! - comparators are separated by whitespace instead of commas
//! - `||` separates alternatives and `a - b` is an inclusive hyphen range
//! - `x`/`X` are wildcards, and a leading `v` or `=` on a version is allowed

use semver::{Version, VersionReq};
use std::fmt;

/// Parses a concrete version, accepting a leading `=` or `v`
pub fn parse_version(input: &str) -> Option<Version> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('=').unwrap_or(trimmed).trim_start();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed).ok()
}

/// Returns true if the input is a concrete version rather than a range
pub fn is_concrete_version(input: &str) -> bool {
    parse_version(input).is_some()
}

/// A parsed npm range: a union of semver requirements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmRange {
    alternatives: Vec<VersionReq>,
}

impl NpmRange {
    /// Parses an npm range, returning `None` when it is not valid semver syntax
    pub fn parse(input: &str) -> Option<Self> {
        let alternatives = input
            .split("||")
            .map(parse_alternative)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { alternatives })
    }

    /// Returns true if the version satisfies any alternative
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

fn parse_alternative(input: &str) -> Option<VersionReq> {
    let input = input.trim();
    if input.is_empty() || input == "*" || input.eq_ignore_ascii_case("x") {
        return Some(VersionReq::STAR);
    }

    // Hyphen range: `1.2.3 - 2.3.4` means `>=1.2.3 <=2.3.4`
    if let Some((low, high)) = input.split_once(" - ") {
        let low = normalize_partial(low.trim())?;
        let high = normalize_partial(high.trim())?;
        return VersionReq::parse(&format!(">={}, <={}", low, high)).ok();
    }

    let mut comparators = Vec::new();
    let mut pending_op: Option<&str> = None;
    for token in input.split_whitespace() {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '^' | '~')) {
            pending_op = Some(token);
            continue;
        }
        let comparator = match pending_op.take() {
            Some(op) => format!("{}{}", op, token),
            None => token.to_string(),
        };
        comparators.push(normalize_comparator(&comparator)?);
    }
    if pending_op.is_some() || comparators.is_empty() {
        return None;
    }

    VersionReq::parse(&comparators.join(", ")).ok()
}

fn normalize_comparator(comparator: &str) -> Option<String> {
    let split = comparator
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '^' | '~'))
        .unwrap_or(comparator.len());
    let (op, version) = comparator.split_at(split);
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() {
        return None;
    }
    let version = replace_x_wildcards(version);
    if version == "*" {
        return Some("*".to_string());
    }

    match op {
        // npm treats a bare version as an exact pin
        "" if !version.contains('*') => Some(format!("={}", version)),
        "" => Some(version),
        "<" | "<=" | ">" | ">=" | "=" | "^" | "~" => Some(format!("{}{}", op, version)),
        _ => None,
    }
}

fn replace_x_wildcards(version: &str) -> String {
    let core_end = version.find(['-', '+']).unwrap_or(version.len());
    let (core, rest) = version.split_at(core_end);
    let core = core
        .split('.')
        .map(|part| if part.eq_ignore_ascii_case("x") { "*" } else { part })
        .collect::<Vec<_>>()
        .join(".");
    format!("{}{}", core, rest)
}

fn normalize_partial(version: &str) -> Option<String> {
    let version = version.strip_prefix('v').unwrap_or(version);
    if version.is_empty() || !version.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some(version.to_string())
}

/// The prefix a declared range puts in front of its version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeModifier {
    /// `^1.2.3`
    Caret,
    /// `~1.2.3`
    Tilde,
    /// `1.2.3`
    Exact,
}

impl RangeModifier {
    /// Extracts the modifier of a declared range, defaulting to caret for
    /// anything that is not a simple `[^~]version`
    pub fn of(range: &str) -> Self {
        let range = range.trim();
        if let Some(rest) = range.strip_prefix('^') {
            if is_concrete_version(rest) {
                return RangeModifier::Caret;
            }
        }
        if let Some(rest) = range.strip_prefix('~') {
            if is_concrete_version(rest) {
                return RangeModifier::Tilde;
            }
        }
        if is_concrete_version(range) {
            return RangeModifier::Exact;
        }
        RangeModifier::Caret
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeModifier::Caret => "^",
            RangeModifier::Tilde => "~",
            RangeModifier::Exact => "",
        }
    }

    /// Formats a concrete version with this modifier
    pub fn apply(&self, version: &str) -> String {
        format!("{}{}", self.as_str(), version)
    }
}

impl fmt::Display for RangeModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
