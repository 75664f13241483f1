//! upgrade-interactive - interactive dependency upgrade CLI tool
//!
//! Offers the dependencies of a Node.js project's workspaces for upgrade,
//! lets the user pick compatible or latest ranges, and reports the changes.

use clap::Parser;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use upgrade_interactive::cli::CliArgs;
use upgrade_interactive::error::ConfigError;
use upgrade_interactive::logging;
use upgrade_interactive::orchestrator::Orchestrator;
use upgrade_interactive::output::{create_formatter, OutputConfig, TerminalPrompt, TerminalSink};
use upgrade_interactive::project::{NodeProject, MANIFEST_FILENAME};
use upgrade_interactive::settings::{ProjectSettings, RunConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    logging::init(args.verbose, args.quiet);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        return Err(ConfigError::NonInteractive.into());
    }

    let config = RunConfig::from_cli(&args)?;

    let root = NodeProject::locate_root(&args.cwd)?;
    let mut project = NodeProject::load(&root)?;
    let settings = ProjectSettings::from_value(project.settings(), &root.join(MANIFEST_FILENAME))?;
    let mut config = config.with_settings(&settings)?;
    config.cwd = root;
    debug!(
        viewport = config.viewport_size,
        rules = config.exclusions.len(),
        registry = %config.registry_url,
        "configuration resolved"
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let orchestrator = Orchestrator::new(config)?;
    let mut sink = TerminalSink::new(io::stdout(), !args.quiet, true);
    let mut prompt = TerminalPrompt;
    let result = orchestrator
        .run(&mut project, &mut sink, &mut prompt, &cancel)
        .await?;

    // Output results
    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.verbose, args.quiet));
    let mut stdout = io::stdout().lock();
    formatter.format(&result, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
