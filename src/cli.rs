//! CLI argument parsing module for upgrade-interactive

use crate::error::ConfigError;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a viewport size: a positive number of rows
fn parse_viewport_size(s: &str) -> Result<usize, ConfigError> {
    let s = s.trim();
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidViewportSize {
            value: s.to_string(),
        }),
    }
}

/// Interactively upgrade dependencies across workspaces
#[derive(Parser, Debug, Clone)]
#[command(
    name = "upgrade-interactive",
    version,
    about = "Interactively upgrade dependencies across workspaces"
)]
pub struct CliArgs {
    /// Workspaces to consider (default: all workspaces)
    #[arg(value_name = "WORKSPACE")]
    pub workspaces: Vec<String>,

    /// Exclude dependencies: [<workspace-or-dir>#]<name-glob>[@<range-or-glob>],
    /// comma-separated (can be specified multiple times)
    #[arg(short, long, value_name = "SPEC", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Project root (default: current directory)
    #[arg(long, default_value = ".")]
    pub cwd: PathBuf,

    /// Number of rows shown at once; also sizes the background batches
    #[arg(long, value_parser = parse_viewport_size)]
    pub viewport_size: Option<usize>,

    /// npm registry to query
    #[arg(long, env = "NPM_CONFIG_REGISTRY")]
    pub registry: Option<String>,

    // Output options
    /// Output the applied changes in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output (debug logging)
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["upgrade-interactive"]);
        assert!(args.workspaces.is_empty());
        assert!(args.exclude.is_empty());
        assert_eq!(args.cwd, PathBuf::from("."));
        assert!(args.viewport_size.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_positional_workspaces() {
        let args = CliArgs::parse_from(["upgrade-interactive", "@mx/app", "docs"]);
        assert_eq!(args.workspaces, vec!["@mx/app", "docs"]);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = CliArgs::parse_from([
            "upgrade-interactive",
            "--exclude",
            "react,@types/*",
            "-e",
            "@mx/app#react@npm:^19.0.0",
        ]);
        assert_eq!(args.exclude, vec!["react,@types/*", "@mx/app#react@npm:^19.0.0"]);
    }

    #[test]
    fn test_viewport_size() {
        let args = CliArgs::parse_from(["upgrade-interactive", "--viewport-size", "5"]);
        assert_eq!(args.viewport_size, Some(5));
    }

    #[test]
    fn test_viewport_size_rejects_zero_and_garbage() {
        assert!(CliArgs::try_parse_from(["upgrade-interactive", "--viewport-size", "0"]).is_err());
        assert!(CliArgs::try_parse_from(["upgrade-interactive", "--viewport-size", "x"]).is_err());
    }

    #[test]
    fn test_parse_viewport_size() {
        assert_eq!(parse_viewport_size("10"), Ok(10));
        assert_eq!(parse_viewport_size(" 3 "), Ok(3));
        assert_eq!(
            parse_viewport_size("0"),
            Err(ConfigError::InvalidViewportSize {
                value: "0".to_string()
            })
        );
        assert_eq!(
            parse_viewport_size("-1"),
            Err(ConfigError::InvalidViewportSize {
                value: "-1".to_string()
            })
        );
    }

    #[test]
    fn test_registry_flag() {
        let args = CliArgs::parse_from([
            "upgrade-interactive",
            "--registry",
            "http://localhost:4873",
        ]);
        assert_eq!(args.registry.as_deref(), Some("http://localhost:4873"));
    }

    #[test]
    fn test_combined_flags() {
        let args = CliArgs::parse_from([
            "upgrade-interactive",
            "@mx/app",
            "--cwd",
            "/path/to/project",
            "--json",
            "-q",
            "--verbose",
        ]);
        assert_eq!(args.workspaces, vec!["@mx/app"]);
        assert_eq!(args.cwd, PathBuf::from("/path/to/project"));
        assert!(args.json);
        assert!(args.quiet);
        assert!(args.verbose);
    }
}
