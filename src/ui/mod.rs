//! User interface module - terminal output.
//!
//! The finish is non-interactive, so this module only re-exports the
//! formatting helpers and maps a workflow outcome to output.

pub mod formatter;

pub use formatter::{
    display_config, display_error, display_failure, display_plan, display_status, display_step,
    display_success, display_summary,
};

use crate::cli::orchestration::WorkflowOutcome;
use crate::error::{ErrorKind, FinishError};

/// Exit code for errors raised outside a run.
pub const GLUE_EXIT_CODE: i32 = 1;

/// Prints `outcome` and returns the process exit code for it.
pub fn report_outcome(outcome: &WorkflowOutcome) -> i32 {
    match outcome {
        WorkflowOutcome::Finished(report) => {
            display_success(&format!(
                "Tagged {} and moved development to {}",
                report.tag, report.next_version
            ));
            display_summary(report);
            0
        }
        WorkflowOutcome::Planned(plan) => {
            display_success(&format!(
                "Release branch '{}' is ready to finish",
                plan.release.name
            ));
            display_plan(plan);
            0
        }
        WorkflowOutcome::Failed(failure) => {
            display_failure(failure);
            failure.exit_code()
        }
    }
}

/// Prints an error raised before the finisher ran and returns its exit code.
///
/// Configuration errors keep their own code; everything else (missing
/// repository, unreadable files) exits with [GLUE_EXIT_CODE].
pub fn report_error(error: &anyhow::Error) -> i32 {
    display_error(&format!("{:#}", error));
    exit_code_for(error)
}

/// Exit code for an error raised before the finisher ran.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<FinishError>())
        .find(|e| e.kind() == ErrorKind::Configuration)
        .map(FinishError::exit_code)
        .unwrap_or(GLUE_EXIT_CODE)
}
