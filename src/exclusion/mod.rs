//! Exclusion rules for `--exclude`
//!
//! This module provides:
//! - A parser for the `[<location>#]<name>[@<range>]` mini-language
//! - Anchored glob matching for names and non-semver version constraints
//! - A matcher deciding whether a dependency entry is excluded

mod glob;
mod matcher;
mod parser;

pub use glob::{matches, Glob};
pub use matcher::ExclusionMatcher;
pub use parser::{parse_exclusions, ExclusionRule};
