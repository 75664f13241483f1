//! Orchestrator for the interactive upgrade workflow
//!
//! This module provides:
//! - Workflow coordination: select workspaces → filter → resolve → prompt → apply
//! - Cancellation of both the resolution phase and the prompt
//! - The run result consumed by the output formatters

use crate::domain::Selection;
use crate::error::AppError;
use crate::exclusion::ExclusionMatcher;
use crate::output::{PromptAnswer, SelectionPrompt};
use crate::project::{collect_candidates, select_workspaces, Project};
use crate::registry::{HttpClient, NpmOracle, VersionOracle};
use crate::select::{SelectionAggregator, SelectionOutcome};
use crate::settings::RunConfig;
use crate::suggest::{DisplaySink, ScheduleOutcome, SuggestionResolver, SuggestionScheduler};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every entry was excluded or not a registry dependency
    NoCandidates,
    /// Candidates exist but none has an upgrade
    UpToDate,
    /// Interrupted during resolution or at the prompt
    Cancelled,
    /// The selection was applied (possibly changing nothing)
    Applied(SelectionOutcome),
}

/// Result of running the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorResult {
    /// Number of candidates after filtering and deduplication
    pub candidates: usize,
    /// Number of candidates offered with at least one upgrade
    pub offered: usize,
    pub status: RunStatus,
}

impl OrchestratorResult {
    fn new(candidates: usize, offered: usize, status: RunStatus) -> Self {
        Self {
            candidates,
            offered,
            status,
        }
    }

    /// Returns true if any workspace entry was modified
    pub fn changed(&self) -> bool {
        matches!(&self.status, RunStatus::Applied(outcome) if outcome.changed())
    }
}

/// Orchestrator for the upgrade workflow
pub struct Orchestrator {
    config: RunConfig,
    oracle: Arc<dyn VersionOracle>,
    color: bool,
}

impl Orchestrator {
    /// Create an orchestrator querying the configured npm registry
    pub fn new(config: RunConfig) -> Result<Self, AppError> {
        let client = HttpClient::new()?;
        let oracle = NpmOracle::with_registry(client, config.registry_url.clone());
        Ok(Self::with_oracle(config, Arc::new(oracle)))
    }

    /// Create an orchestrator with a custom oracle (for testing)
    pub fn with_oracle(config: RunConfig, oracle: Arc<dyn VersionOracle>) -> Self {
        Self {
            config,
            oracle,
            color: true,
        }
    }

    /// Enable or disable colorized suggestion labels
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run the workflow against a project
    pub async fn run<P: Project + ?Sized>(
        &self,
        project: &mut P,
        sink: &mut dyn DisplaySink,
        prompt: &mut dyn SelectionPrompt,
        cancel: &CancellationToken,
    ) -> Result<OrchestratorResult, AppError> {
        let matcher = ExclusionMatcher::new(self.config.exclusions.clone())?;

        let candidates = {
            let selected = select_workspaces(&*project, &self.config.workspaces)?;
            collect_candidates(&*project, &selected, &matcher, &self.config.cwd)
        };
        if candidates.is_empty() {
            info!("no candidates to resolve");
            return Ok(OrchestratorResult::new(0, 0, RunStatus::NoCandidates));
        }

        let resolver = SuggestionResolver::new(self.oracle.clone()).with_color(self.color);
        let scheduler = SuggestionScheduler::new(resolver, self.config.viewport_size);
        let sets = match scheduler.run(&candidates, sink, cancel).await {
            ScheduleOutcome::Completed(sets) => sets,
            ScheduleOutcome::Cancelled => {
                return Ok(OrchestratorResult::new(
                    candidates.len(),
                    0,
                    RunStatus::Cancelled,
                ));
            }
        };

        let total = candidates.len();
        let offered = sets.len();
        if sets.is_empty() {
            return Ok(OrchestratorResult::new(total, 0, RunStatus::UpToDate));
        }

        let answer = tokio::select! {
            biased;
            _ = cancel.cancelled() => PromptAnswer::Cancel,
            answer = prompt.select(&sets) => answer?,
        };

        let selection: Selection = match answer {
            PromptAnswer::Submit(selection) => selection,
            PromptAnswer::Cancel => {
                debug!("selection cancelled");
                return Ok(OrchestratorResult::new(total, offered, RunStatus::Cancelled));
            }
        };

        let outcome = SelectionAggregator::apply(project.workspaces_mut(), &selection);
        info!(changes = outcome.changes.len(), "selection applied");
        Ok(OrchestratorResult::new(
            total,
            offered,
            RunStatus::Applied(outcome),
        ))
    }
}
