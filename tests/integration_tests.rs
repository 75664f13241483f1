//! Integration tests for upgrade-interactive
//!
//! These tests verify:
//! - Exclusion scenarios against projects loaded from disk
//! - The full workflow against a fake version oracle
//! - Order-stable progressive resolution across many candidates
//! - Selection write-back and idempotence

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use upgrade_interactive::domain::{
    CandidateId, DependencyCandidate, DependencyKind, Selection, SuggestionSet, WorkspaceIdent,
};
use upgrade_interactive::error::{AppError, RegistryError};
use upgrade_interactive::exclusion::ExclusionMatcher;
use upgrade_interactive::orchestrator::{Orchestrator, RunStatus};
use upgrade_interactive::output::{PromptAnswer, SelectionPrompt};
use upgrade_interactive::project::{collect_candidates, select_workspaces, NodeProject, Project};
use upgrade_interactive::registry::VersionOracle;
use upgrade_interactive::select::SelectionAggregator;
use upgrade_interactive::settings::{ProjectSettings, RunConfig};
use upgrade_interactive::suggest::{NullSink, ScheduleOutcome, SuggestionResolver, SuggestionScheduler};

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Oracle answering `latest` and every range from a version table
struct FakeOracle {
    /// package -> (compatible answer, latest answer)
    versions: HashMap<String, (String, String)>,
    /// optional per-package latency
    delays: HashMap<String, Duration>,
}

impl FakeOracle {
    fn new(entries: &[(&str, &str, &str)]) -> Self {
        Self {
            versions: entries
                .iter()
                .map(|(name, compatible, latest)| {
                    (name.to_string(), (compatible.to_string(), latest.to_string()))
                })
                .collect(),
            delays: HashMap::new(),
        }
    }

    fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }
}

#[async_trait]
impl VersionOracle for FakeOracle {
    fn registry_name(&self) -> &'static str {
        "fake"
    }

    async fn resolve(&self, package: &str, range: &str) -> Result<Option<String>, RegistryError> {
        if let Some(delay) = self.delays.get(package) {
            tokio::time::sleep(*delay).await;
        }
        let (compatible, latest) = self
            .versions
            .get(package)
            .ok_or_else(|| RegistryError::package_not_found(package, "fake"))?;
        Ok(Some(if range == "latest" {
            latest.clone()
        } else {
            compatible.clone()
        }))
    }
}

/// Prompt replaying a fixed answer and recording what it was shown
struct ScriptedPrompt {
    answer: Box<dyn Fn(&[SuggestionSet]) -> PromptAnswer + Send>,
    shown: Vec<String>,
}

impl ScriptedPrompt {
    fn new(answer: impl Fn(&[SuggestionSet]) -> PromptAnswer + Send + 'static) -> Self {
        Self {
            answer: Box::new(answer),
            shown: Vec::new(),
        }
    }
}

#[async_trait]
impl SelectionPrompt for ScriptedPrompt {
    async fn select(&mut self, sets: &[SuggestionSet]) -> Result<PromptAnswer, AppError> {
        self.shown
            .extend(sets.iter().map(|s| s.candidate.descriptor().to_string()));
        Ok((self.answer)(sets))
    }
}

fn monorepo() -> TempDir {
    let temp_dir = create_test_dir();
    write(
        temp_dir.path(),
        "package.json",
        r#"{
            "name": "mono",
            "private": true,
            "workspaces": ["packages/*"],
            "devDependencies": { "typescript": "~5.4.0" },
            "upgradeInteractive": { "exclude": ["eslint*"], "viewportSize": 4 }
        }"#,
    );
    write(
        temp_dir.path(),
        "packages/app/package.json",
        r#"{
            "name": "@mx/app",
            "dependencies": {
                "react": "19.1.0",
                "@mx/ui": "workspace:^",
                "lodash": "^4.17.0"
            },
            "devDependencies": { "eslint": "^8.57.0" }
        }"#,
    );
    write(
        temp_dir.path(),
        "packages/other/package.json",
        r#"{
            "name": "@mx/other",
            "dependencies": { "react": "19.1.0" }
        }"#,
    );
    write(
        temp_dir.path(),
        "packages/ui/package.json",
        r#"{
            "name": "@mx/ui",
            "dependencies": { "lodash": "^4.17.0" }
        }"#,
    );
    temp_dir
}

mod exclusion_scenarios {
    use super::*;

    fn candidate(name: &str, range: &str, workspace: &str) -> DependencyCandidate {
        DependencyCandidate::new(
            name,
            range,
            WorkspaceIdent::parse(workspace),
            DependencyKind::Dependencies,
        )
    }

    #[test]
    fn test_name_only_rules_filter_candidates() {
        let temp_dir = create_test_dir();
        write(
            temp_dir.path(),
            "package.json",
            r#"{
                "name": "site",
                "dependencies": {
                    "react": "18.0.0",
                    "@types/node": "20.0.0",
                    "lodash": "4.0.0"
                }
            }"#,
        );

        let project = NodeProject::load(temp_dir.path()).unwrap();
        let all = select_workspaces(&project, &[]).unwrap();
        let matcher = ExclusionMatcher::from_spec("react,@types/*").unwrap();
        let candidates = collect_candidates(&project, &all, &matcher, temp_dir.path());

        let names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["lodash"]);
    }

    #[test]
    fn test_workspace_scoped_rule_with_npm_protocol() {
        let matcher = ExclusionMatcher::from_spec("@mx/app#react@npm:^19.0.0").unwrap();
        let cwd = Path::new("/repo");

        assert!(matcher.is_excluded(&candidate("react", "19.1.0", "@mx/app"), cwd));
        assert!(!matcher.is_excluded(&candidate("react", "19.1.0", "@mx/other"), cwd));
    }

    #[test]
    fn test_scoped_rule_against_loaded_monorepo() {
        let temp_dir = monorepo();
        let project = NodeProject::load(temp_dir.path()).unwrap();
        let all = select_workspaces(&project, &[]).unwrap();
        let matcher = ExclusionMatcher::from_spec("@mx/app#react@npm:^19.0.0").unwrap();

        let candidates = collect_candidates(&project, &all, &matcher, temp_dir.path());

        // Both workspaces declare react@19.1.0; only @mx/app's entry is excluded
        let react: Vec<String> = candidates
            .iter()
            .filter(|c| c.name == "react")
            .map(|c| c.workspace.to_string())
            .collect();
        assert_eq!(react, vec!["@mx/other"]);
        assert!(candidates.iter().all(|c| c.name != "@mx/ui"));
    }

    #[test]
    fn test_version_predicate_paths() {
        let semver = ExclusionMatcher::from_spec("pkg@^18.0.0").unwrap();
        assert!(semver.is_excluded(&candidate("pkg", "18.2.0", "root"), Path::new("/")));

        let glob = ExclusionMatcher::from_spec("pkg@18.*").unwrap();
        assert!(!glob.is_excluded(&candidate("pkg", "not-semver-tag", "root"), Path::new("/")));
        assert!(glob.is_excluded(&candidate("pkg", "18.x-custom", "root"), Path::new("/")));
    }
}

mod workflow {
    use super::*;
    use clap::Parser;
    use upgrade_interactive::cli::CliArgs;

    fn config(root: &Path, project: &NodeProject, extra: &[&str]) -> RunConfig {
        let mut argv = vec!["upgrade-interactive"];
        argv.extend_from_slice(extra);
        let settings =
            ProjectSettings::from_value(project.settings(), &root.join("package.json")).unwrap();
        let mut config = RunConfig::resolve(&CliArgs::parse_from(argv), &settings).unwrap();
        config.cwd = root.to_path_buf();
        config
    }

    fn oracle() -> Arc<FakeOracle> {
        Arc::new(FakeOracle::new(&[
            ("react", "19.1.0", "19.2.0"),
            ("lodash", "4.17.21", "4.17.21"),
            ("typescript", "5.4.5", "5.6.3"),
            ("eslint", "8.57.1", "9.12.0"),
        ]))
    }

    #[tokio::test]
    async fn test_settings_exclusions_and_viewport_apply() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let config = config(temp_dir.path(), &project, &[]);
        assert_eq!(config.viewport_size, 4);

        let mut prompt = ScriptedPrompt::new(|_| PromptAnswer::Submit(Selection::new()));
        let result = Orchestrator::with_oracle(config, oracle())
            .with_color(false)
            .run(&mut project, &mut NullSink, &mut prompt, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            prompt.shown,
            vec!["lodash@^4.17.0", "react@19.1.0", "typescript@~5.4.0"]
        );
        assert_eq!(result.status, RunStatus::Applied(Default::default()));
        assert!(!result.changed());
    }

    #[tokio::test]
    async fn test_selection_is_written_to_every_workspace() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let config = config(temp_dir.path(), &project, &["--exclude", "typescript"]);

        let mut prompt = ScriptedPrompt::new(|sets| {
            let mut selection = Selection::new();
            for set in sets {
                selection.choose(set.candidate.id.clone(), set.latest().value.clone());
            }
            PromptAnswer::Submit(selection)
        });
        let result = Orchestrator::with_oracle(config, oracle())
            .with_color(false)
            .run(&mut project, &mut NullSink, &mut prompt, &CancellationToken::new())
            .await
            .unwrap();

        assert!(result.changed());
        for workspace in ["@mx/app", "@mx/other"] {
            let ws = project
                .workspaces()
                .iter()
                .find(|w| w.ident.to_string() == workspace)
                .unwrap();
            assert_eq!(
                ws.dependency("react", DependencyKind::Dependencies).unwrap().range,
                "19.2.0"
            );
        }
        // lodash compatible is newer, latest equals compatible; not chosen here
        let ui = &project.workspaces()[3];
        assert_eq!(
            ui.dependency("lodash", DependencyKind::Dependencies).unwrap().range,
            "^4.17.0"
        );
    }

    #[tokio::test]
    async fn test_prompt_cancel_leaves_project_untouched() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let before = project.workspaces().to_vec();
        let config = config(temp_dir.path(), &project, &[]);

        let mut prompt = ScriptedPrompt::new(|_| PromptAnswer::Cancel);
        let result = Orchestrator::with_oracle(config, oracle())
            .run(&mut project, &mut NullSink, &mut prompt, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.status, RunStatus::Cancelled);
        assert_eq!(project.workspaces(), before.as_slice());
    }

    #[tokio::test]
    async fn test_unknown_workspace_aborts() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let config = config(temp_dir.path(), &project, &["@mx/missing"]);

        let mut prompt = ScriptedPrompt::new(|_| PromptAnswer::Cancel);
        let err = Orchestrator::with_oracle(config, oracle())
            .run(&mut project, &mut NullSink, &mut prompt, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "workspace '@mx/missing' not found in project");
        assert!(prompt.shown.is_empty());
    }
}

mod scheduling {
    use super::*;

    fn candidates(count: usize) -> Vec<DependencyCandidate> {
        (0..count)
            .map(|i| {
                DependencyCandidate::new(
                    format!("pkg-{:02}", i),
                    "^1.0.0",
                    WorkspaceIdent::new("root"),
                    DependencyKind::Dependencies,
                )
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolver_and_scheduler_keep_input_order() {
        let candidates = candidates(30);
        let mut oracle = FakeOracle::new(&[]);
        for (i, candidate) in candidates.iter().enumerate() {
            // Every third package is already up to date
            let latest = if i % 3 == 0 { "1.0.0" } else { "2.0.0" };
            oracle
                .versions
                .insert(candidate.name.clone(), ("1.0.0".to_string(), latest.to_string()));
            oracle = oracle.with_delay(&candidate.name, Duration::from_millis(97 * (30 - i as u64)));
        }

        let resolver = SuggestionResolver::new(Arc::new(oracle)).with_color(false);
        let scheduler = SuggestionScheduler::new(resolver, 10);
        let outcome = scheduler
            .run(&candidates, &mut NullSink, &CancellationToken::new())
            .await;

        let ScheduleOutcome::Completed(sets) = outcome else {
            panic!("unexpected cancellation");
        };
        let expected: Vec<&str> = candidates
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, c)| c.name.as_str())
            .collect();
        let names: Vec<&str> = sets.iter().map(|s| s.candidate.name.as_str()).collect();
        assert_eq!(names, expected);
        assert!(sets.iter().all(|s| s.latest().value.as_deref() == Some("^2.0.0")));
    }
}

mod selection {
    use super::*;

    #[test]
    fn test_aggregator_is_idempotent_on_loaded_project() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let selection = Selection::new()
            .with_choice(CandidateId::new("lodash", "^4.17.0"), "^4.17.21")
            .with_choice(CandidateId::new("typescript", "~5.4.0"), "~5.6.3");

        let first = SelectionAggregator::apply(project.workspaces_mut(), &selection);
        assert_eq!(first.changes.len(), 3);
        let after_first = project.workspaces().to_vec();

        let second = SelectionAggregator::apply(project.workspaces_mut(), &selection);
        assert!(!second.changed());
        assert_eq!(project.workspaces(), after_first.as_slice());
    }

    #[test]
    fn test_empty_selection_reports_no_change() {
        let temp_dir = monorepo();
        let mut project = NodeProject::load(temp_dir.path()).unwrap();
        let outcome = SelectionAggregator::apply(project.workspaces_mut(), &Selection::new());
        assert!(!outcome.changed());
    }
}
