//! Anchored glob matching
//!
//! `*` matches any run of characters (including none), `?` matches exactly
//! one character, everything else is literal.

use crate::error::ExclusionError;
use regex::Regex;

/// A compiled glob pattern
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compile a glob pattern
    pub fn new(pattern: &str) -> Result<Self, ExclusionError> {
        let regex = Regex::new(&to_regex(pattern)).map_err(|e| ExclusionError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns true if the whole value matches the pattern
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

/// One-shot match of a value against a glob pattern
pub fn matches(value: &str, pattern: &str) -> bool {
    Glob::new(pattern)
        .map(|glob| glob.is_match(value))
        .unwrap_or(false)
}

fn to_regex(pattern: &str) -> String {
    let mut source = String::with_capacity(pattern.len() + 8);
    source.push_str("^(?s:");
    let mut literal = [0u8; 4];
    for c in pattern.chars() {
        match c {
            '*' => source.push_str(".*"),
            '?' => source.push('.'),
            _ => source.push_str(&regex::escape(c.encode_utf8(&mut literal))),
        }
    }
    source.push_str(")$");
    source
}
