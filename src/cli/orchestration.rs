//! Main workflow orchestration logic
//!
//! Loads configuration, builds the real collaborators and runs the finisher.
//! Kept apart from `main.rs` so the workflow can be called without clap.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::build::{Maven, PomFile};
use crate::config::{self, Config};
use crate::error::StepFailure;
use crate::finisher::{FinishPlan, FinishReport, FinishStep, ReleaseFinisher};
use crate::git::GitRepository;

/// Arguments for the finish workflow
///
/// Mirrors the CLI Args in a form that does not depend on clap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinishWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<PathBuf>,

    /// Directory inside the repository; defaults to the current directory
    pub project_dir: Option<PathBuf>,

    /// Validate and print the planned commands only
    pub dry_run: bool,

    /// Overall deadline, overrides `behavior.deadline_secs`
    pub deadline: Option<Duration>,

    /// Overrides `gitflow.version_tag_prefix`
    pub tag_prefix: Option<String>,
}

/// Result of a workflow run that got as far as the finisher
#[derive(Debug)]
pub enum WorkflowOutcome {
    Finished(FinishReport),
    Planned(FinishPlan),
    Failed(StepFailure),
}

/// Loads the configuration for `args` and applies command-line overrides.
pub fn resolve_config(args: &FinishWorkflowArgs) -> Result<Config> {
    let project_dir = project_dir(args)?;
    let mut config = config::load_config(args.config_path.as_deref(), &project_dir)
        .context("Error loading config")?;

    if let Some(prefix) = &args.tag_prefix {
        config.gitflow.version_tag_prefix = prefix.clone();
    }
    if let Some(deadline) = args.deadline {
        config.behavior.deadline_secs = Some(deadline.as_secs());
    }

    config.validate()?;
    Ok(config)
}

fn project_dir(args: &FinishWorkflowArgs) -> Result<PathBuf> {
    match &args.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Cannot determine current directory"),
    }
}

/// Main finish workflow
///
/// 1. Resolve configuration
/// 2. Open the git repository
/// 3. Wire Maven and the project's POM
/// 4. Run the finisher (or only plan it on dry run)
///
/// Errors before the finisher starts (config, repository discovery) come back
/// as `Err`; a failed step comes back as [WorkflowOutcome::Failed].
pub fn run_finish_workflow(
    args: &FinishWorkflowArgs,
    on_step: impl Fn(FinishStep),
) -> Result<WorkflowOutcome> {
    let config = resolve_config(args)?;
    let project_dir = project_dir(args)?;

    let repo = GitRepository::open(&project_dir, &config.tools)
        .with_context(|| format!("Git repository error in {}", project_dir.display()))?;
    info!(workdir = %repo.workdir().display(), "opened repository");

    let maven = Maven::new(&project_dir, &config.tools);
    let pom = PomFile::in_dir(&project_dir);

    let mut finisher =
        ReleaseFinisher::new(&repo, &maven, &pom, &config.gitflow).on_step(on_step);
    if let Some(deadline) = config.behavior.deadline().and_then(deadline_from_now) {
        finisher = finisher.with_deadline(deadline);
    }

    let outcome = if args.dry_run {
        finisher.plan().map(WorkflowOutcome::Planned)
    } else {
        finisher.finish().map(WorkflowOutcome::Finished)
    };

    Ok(outcome.unwrap_or_else(WorkflowOutcome::Failed))
}

/// Instant `timeout` from now, or `None` when that lies beyond what the
/// platform clock can represent (the run then has no deadline).
pub fn deadline_from_now(timeout: Duration) -> Option<Instant> {
    let deadline = Instant::now().checked_add(timeout);
    if deadline.is_none() {
        debug!(secs = timeout.as_secs(), "deadline out of clock range, ignoring it");
    }
    deadline
}
