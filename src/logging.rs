//! Logging setup
//!
//! Logs go to stderr so they never interleave with the prompt and report on
//! stdout. `UPGRADE_INTERACTIVE_LOG` takes an `EnvFilter` directive and
//! overrides the level chosen from the flags.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "UPGRADE_INTERACTIVE_LOG";

/// Default directive for the given flags
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "upgrade_interactive=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Install the global subscriber; a second call is a no-op
pub fn init(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
