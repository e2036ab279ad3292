//! Release finish state machine
//!
//! Drives a repository from "one release branch exists" to "production tagged,
//! development on the next snapshot, release branch deleted". Steps run in a
//! fixed order; the first failure stops the run and nothing already done is
//! undone.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::build::{BuildTool, ProjectMetadata};
use crate::config::GitFlowConfig;
use crate::domain::{next_snapshot_version, ReleaseBranch};
use crate::error::{FinishError, Result, StepFailure};
use crate::git::{Repository, MERGE_FLAGS};

/// Message of the annotated release tag.
pub const TAG_MESSAGE: &str = "tagging release";

/// Message of the commit that moves development to the next snapshot.
pub const BUMP_COMMIT_MESSAGE: &str = "updating poms for next development version";

/// Checkpoints of a release finish, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FinishStep {
    PreflightCheck,
    ResolveReleaseBranch,
    BuildRelease,
    MergeToProduction,
    TagProduction,
    MergeToDevelopment,
    ComputeNextVersion,
    BumpDevelopmentVersion,
    DeleteReleaseBranch,
}

impl FinishStep {
    pub const ALL: [FinishStep; 9] = [
        FinishStep::PreflightCheck,
        FinishStep::ResolveReleaseBranch,
        FinishStep::BuildRelease,
        FinishStep::MergeToProduction,
        FinishStep::TagProduction,
        FinishStep::MergeToDevelopment,
        FinishStep::ComputeNextVersion,
        FinishStep::BumpDevelopmentVersion,
        FinishStep::DeleteReleaseBranch,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FinishStep::PreflightCheck => "preflight-check",
            FinishStep::ResolveReleaseBranch => "resolve-release-branch",
            FinishStep::BuildRelease => "build-release",
            FinishStep::MergeToProduction => "merge-to-production",
            FinishStep::TagProduction => "tag-production",
            FinishStep::MergeToDevelopment => "merge-to-development",
            FinishStep::ComputeNextVersion => "compute-next-version",
            FinishStep::BumpDevelopmentVersion => "bump-development-version",
            FinishStep::DeleteReleaseBranch => "delete-release-branch",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FinishStep::PreflightCheck => "Checking for uncommitted changes",
            FinishStep::ResolveReleaseBranch => "Resolving release branch",
            FinishStep::BuildRelease => "Building release branch",
            FinishStep::MergeToProduction => "Merging release into production",
            FinishStep::TagProduction => "Tagging production",
            FinishStep::MergeToDevelopment => "Merging release into development",
            FinishStep::ComputeNextVersion => "Computing next development version",
            FinishStep::BumpDevelopmentVersion => "Updating development version",
            FinishStep::DeleteReleaseBranch => "Deleting release branch",
        }
    }

    /// Repository state left behind when a run fails at this step.
    pub fn partial_state_note(&self) -> &'static str {
        match self {
            FinishStep::PreflightCheck | FinishStep::ResolveReleaseBranch => {
                "No changes were made to the repository."
            }
            FinishStep::BuildRelease => {
                "The release branch may be checked out; nothing was merged. Fix the build and run again."
            }
            FinishStep::MergeToProduction => {
                "Production may hold a partial merge; nothing was tagged. Resolve the merge manually."
            }
            FinishStep::TagProduction => {
                "Production is merged but not tagged; development is not merged."
            }
            FinishStep::MergeToDevelopment => {
                "Production is merged and tagged; development may hold a partial merge."
            }
            FinishStep::ComputeNextVersion => {
                "Production and development are merged and tagged; the development version was not updated."
            }
            FinishStep::BumpDevelopmentVersion => {
                "Development is merged; project versions may be modified but not committed."
            }
            FinishStep::DeleteReleaseBranch => {
                "Release is finished except that the release branch still exists."
            }
        }
    }
}

impl fmt::Display for FinishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of a successful finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishReport {
    pub release_branch: String,
    pub release_version: String,
    pub tag: String,
    pub next_version: String,
    pub completed_steps: Vec<FinishStep>,
}

/// Commands a finish would issue, produced without changing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishPlan {
    pub release: ReleaseBranch,
    pub actions: Vec<PlannedAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub step: FinishStep,
    pub action: String,
}

type StepCallback<'a> = Box<dyn Fn(FinishStep) + 'a>;

/// Orchestrates the release finish over the version-control and build-tool
/// collaborators.
pub struct ReleaseFinisher<'a, R, B, M> {
    repo: &'a R,
    build: &'a B,
    metadata: &'a M,
    config: &'a GitFlowConfig,
    deadline: Option<Instant>,
    started: Instant,
    on_step: Option<StepCallback<'a>>,
}

impl<'a, R, B, M> ReleaseFinisher<'a, R, B, M>
where
    R: Repository,
    B: BuildTool,
    M: ProjectMetadata,
{
    pub fn new(repo: &'a R, build: &'a B, metadata: &'a M, config: &'a GitFlowConfig) -> Self {
        ReleaseFinisher {
            repo,
            build,
            metadata,
            config,
            deadline: None,
            started: Instant::now(),
            on_step: None,
        }
    }

    /// Stop before starting any step once `deadline` has passed.
    ///
    /// A step that is already running is never interrupted.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Called with each step just before it starts.
    pub fn on_step(mut self, callback: impl Fn(FinishStep) + 'a) -> Self {
        self.on_step = Some(Box::new(callback));
        self
    }

    /// Runs the full finish transition.
    pub fn finish(&self) -> std::result::Result<FinishReport, StepFailure> {
        let mut completed = Vec::with_capacity(FinishStep::ALL.len());

        self.step(FinishStep::PreflightCheck, &mut completed, || {
            self.check_clean_working_tree()
        })?;

        let release = self.step(FinishStep::ResolveReleaseBranch, &mut completed, || {
            self.resolve_release_branch()
        })?;
        let release_branch = self.config.release_branch(&release.version);
        let tag = self.config.version_tag(&release.version);

        self.step(FinishStep::BuildRelease, &mut completed, || {
            self.repo.checkout(&release.name)?;
            self.build.build()
        })?;

        self.step(FinishStep::MergeToProduction, &mut completed, || {
            self.repo.checkout(&self.config.production_branch)?;
            self.repo.merge_no_ff(&release_branch)
        })?;

        self.step(FinishStep::TagProduction, &mut completed, || {
            self.repo.create_annotated_tag(&tag, TAG_MESSAGE)
        })?;

        self.step(FinishStep::MergeToDevelopment, &mut completed, || {
            self.repo.checkout(&self.config.development_branch)?;
            self.repo.merge_no_ff(&release_branch)
        })?;

        let next_version = self.step(FinishStep::ComputeNextVersion, &mut completed, || {
            self.compute_next_version()
        })?;

        self.step(FinishStep::BumpDevelopmentVersion, &mut completed, || {
            self.build.set_version(&next_version)?;
            self.repo.commit_all(BUMP_COMMIT_MESSAGE)
        })?;

        self.step(FinishStep::DeleteReleaseBranch, &mut completed, || {
            self.repo.delete_branch(&release_branch)
        })?;

        info!(
            release = %release.version,
            tag = %tag,
            next_version = %next_version,
            "release finished"
        );

        Ok(FinishReport {
            release_branch,
            release_version: release.version,
            tag,
            next_version,
            completed_steps: completed,
        })
    }

    /// Validates and resolves the release without changing anything, returning
    /// the commands a [finish](Self::finish) would issue.
    pub fn plan(&self) -> std::result::Result<FinishPlan, StepFailure> {
        let mut completed = Vec::new();

        self.step(FinishStep::PreflightCheck, &mut completed, || {
            self.check_clean_working_tree()
        })?;
        let release = self.step(FinishStep::ResolveReleaseBranch, &mut completed, || {
            self.resolve_release_branch()
        })?;

        let branch = self.config.release_branch(&release.version);
        let tag = self.config.version_tag(&release.version);
        let merge = format!("git merge {} {}", MERGE_FLAGS.join(" "), branch);
        let production = &self.config.production_branch;
        let development = &self.config.development_branch;

        let actions = [
            (FinishStep::BuildRelease, format!("git checkout {}", release.name)),
            (FinishStep::BuildRelease, "build and verify the project".to_string()),
            (FinishStep::MergeToProduction, format!("git checkout {}", production)),
            (FinishStep::MergeToProduction, merge.clone()),
            (
                FinishStep::TagProduction,
                format!("git tag -a {} -m \"{}\"", tag, TAG_MESSAGE),
            ),
            (FinishStep::MergeToDevelopment, format!("git checkout {}", development)),
            (FinishStep::MergeToDevelopment, merge),
            (
                FinishStep::ComputeNextVersion,
                "read project version (computed after merge)".to_string(),
            ),
            (
                FinishStep::BumpDevelopmentVersion,
                "set project version to next snapshot".to_string(),
            ),
            (
                FinishStep::BumpDevelopmentVersion,
                format!("git commit -a -m \"{}\"", BUMP_COMMIT_MESSAGE),
            ),
            (FinishStep::DeleteReleaseBranch, format!("git branch -d {}", branch)),
        ]
        .into_iter()
        .map(|(step, action)| PlannedAction { step, action })
        .collect();

        Ok(FinishPlan { release, actions })
    }

    fn step<T>(
        &self,
        step: FinishStep,
        completed: &mut Vec<FinishStep>,
        run: impl FnOnce() -> Result<T>,
    ) -> std::result::Result<T, StepFailure> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                warn!(step = %step, "deadline exceeded before step");
                return Err(StepFailure::new(
                    step,
                    FinishError::DeadlineExceeded {
                        elapsed: self.started.elapsed(),
                    },
                ));
            }
        }

        if let Some(callback) = &self.on_step {
            callback(step);
        }
        info!(step = %step, "starting step");

        match run() {
            Ok(value) => {
                completed.push(step);
                debug!(step = %step, "step completed");
                Ok(value)
            }
            Err(error) => {
                warn!(step = %step, error = %error, "step failed");
                Err(StepFailure::new(step, error))
            }
        }
    }

    fn check_clean_working_tree(&self) -> Result<()> {
        if self.repo.has_uncommitted_changes()? {
            return Err(FinishError::precondition(
                "You have some uncommitted files. Commit or discard local changes in order to proceed.",
            ));
        }
        Ok(())
    }

    fn resolve_release_branch(&self) -> Result<ReleaseBranch> {
        let prefix = &self.config.release_branch_prefix;
        let branches = self.repo.list_branches(prefix)?;
        let release = branches.resolve(prefix)?;

        debug!(branch = %release.name, version = %release.version, "resolved release branch");
        Ok(release)
    }

    fn compute_next_version(&self) -> Result<String> {
        let current = self.metadata.current_version()?;

        match next_snapshot_version(&current) {
            Some(next) if !next.trim().is_empty() => {
                info!(current = %current.trim(), next = %next, "computed next snapshot version");
                Ok(next)
            }
            _ => Err(FinishError::version_computation(format!(
                "Next snapshot version is blank (current version '{}')",
                current.trim()
            ))),
        }
    }
}
