//! Effective configuration: CLI flags merged with project settings
//!
//! Project settings live under the `upgradeInteractive` key of the root
//! package.json:
//!
//! ```json
//! { "upgradeInteractive": { "exclude": ["@types/*", "docs#*"], "viewportSize": 12 } }
//! ```
//!
//! The CLI viewport size wins over the settings, which win over the default.
//! Exclusions from both sources apply, settings first.

use crate::cli::CliArgs;
use crate::error::{AppError, ConfigError};
use crate::exclusion::{parse_exclusions, ExclusionRule};
use crate::registry::DEFAULT_REGISTRY_URL;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of visible rows
pub const DEFAULT_VIEWPORT_SIZE: usize = 10;

/// `exclude` accepts one spec string or a list of them
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
enum ExcludeSetting {
    One(String),
    Many(Vec<String>),
}

impl Default for ExcludeSetting {
    fn default() -> Self {
        ExcludeSetting::Many(Vec::new())
    }
}

/// Settings read from the root manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    pub exclude: Vec<String>,
    pub viewport_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawSettings {
    #[serde(default)]
    exclude: ExcludeSetting,
    viewport_size: Option<usize>,
}

impl ProjectSettings {
    /// Parse the raw `upgradeInteractive` value; `manifest` is for error context
    pub fn from_value(value: Option<&Value>, manifest: &Path) -> Result<Self, ConfigError> {
        let Some(value) = value else {
            return Ok(Self::default());
        };

        let invalid = |message: String| ConfigError::InvalidSettings {
            path: manifest.to_path_buf(),
            message,
        };

        let raw = RawSettings::deserialize(value).map_err(|e| invalid(e.to_string()))?;
        if raw.viewport_size == Some(0) {
            return Err(ConfigError::InvalidViewportSize {
                value: "0".to_string(),
            });
        }

        let exclude = match raw.exclude {
            ExcludeSetting::One(spec) => vec![spec],
            ExcludeSetting::Many(specs) => specs,
        };

        Ok(Self {
            exclude,
            viewport_size: raw.viewport_size,
        })
    }
}

/// Configuration of one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory the command runs in
    pub cwd: PathBuf,
    /// Workspaces named on the command line
    pub workspaces: Vec<String>,
    /// Exclusion rules from every source
    pub exclusions: Vec<ExclusionRule>,
    pub viewport_size: usize,
    pub registry_url: String,
    pub json: bool,
    pub quiet: bool,
    viewport_from_cli: bool,
}

impl RunConfig {
    /// Build the configuration from CLI flags alone
    ///
    /// Exclusion specs are parsed here so malformed tokens are reported
    /// before the project is read.
    pub fn from_cli(args: &CliArgs) -> Result<Self, AppError> {
        let exclusions = parse_all(&args.exclude)?;
        debug!(rules = exclusions.len(), "parsed exclusion rules from flags");

        Ok(Self {
            cwd: args.cwd.clone(),
            workspaces: args.workspaces.clone(),
            exclusions,
            viewport_size: args.viewport_size.unwrap_or(DEFAULT_VIEWPORT_SIZE),
            registry_url: args
                .registry
                .clone()
                .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string()),
            json: args.json,
            quiet: args.quiet,
            viewport_from_cli: args.viewport_size.is_some(),
        })
    }

    /// Merge project settings; flags keep priority
    pub fn with_settings(mut self, settings: &ProjectSettings) -> Result<Self, AppError> {
        let rules = parse_all(&settings.exclude)?;
        debug!(rules = rules.len(), "parsed exclusion rules from settings");
        self.exclusions.splice(0..0, rules);

        if !self.viewport_from_cli {
            if let Some(size) = settings.viewport_size {
                self.viewport_size = size;
            }
        }
        Ok(self)
    }

    /// Convenience for [`RunConfig::from_cli`] followed by [`RunConfig::with_settings`]
    pub fn resolve(args: &CliArgs, settings: &ProjectSettings) -> Result<Self, AppError> {
        Self::from_cli(args)?.with_settings(settings)
    }
}

fn parse_all(specs: &[String]) -> Result<Vec<ExclusionRule>, AppError> {
    let mut rules = Vec::new();
    for spec in specs {
        rules.extend(parse_exclusions(spec)?);
    }
    Ok(rules)
}
