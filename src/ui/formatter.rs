//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic. Functions here have no
//! side effects beyond printing.

use crate::config::Config;
use crate::error::StepFailure;
use crate::finisher::{FinishPlan, FinishReport, FinishStep};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message);
}

/// Print the step that is about to run, numbered `n/9`.
pub fn display_step(step: FinishStep) {
    let index = FinishStep::ALL
        .iter()
        .position(|s| *s == step)
        .map(|i| i + 1)
        .unwrap_or(0);
    display_status(&format!(
        "[{}/{}] {}",
        index,
        FinishStep::ALL.len(),
        step.description()
    ));
}

/// Display the commands a finish would issue.
pub fn display_plan(plan: &FinishPlan) {
    println!(
        "\n\x1b[1mFinishing release '{}' would run:\x1b[0m",
        plan.release.version
    );
    for (i, action) in plan.actions.iter().enumerate() {
        println!("  {:>2}. [{}] {}", i + 1, action.step, action.action);
    }
}

/// Display the outcome of a successful finish.
pub fn display_summary(report: &FinishReport) {
    println!("\n\x1b[1mRelease {} finished\x1b[0m", report.release_version);
    println!("  Tag:          \x1b[32m{}\x1b[0m", report.tag);
    println!("  Next version: \x1b[32m{}\x1b[0m", report.next_version);
    println!("  Deleted:      {}", report.release_branch);
}

/// Display a failed run: the failing step, its cause and what was left behind.
pub fn display_failure(failure: &StepFailure) {
    display_error(&format!(
        "Step '{}' failed: {}",
        failure.step, failure.error
    ));
    eprintln!("  {}", failure.step.partial_state_note());
    if failure.step > FinishStep::ResolveReleaseBranch {
        eprintln!("  Completed steps were not rolled back; inspect the repository before retrying.");
    }
}

/// Display the resolved gitflow configuration.
pub fn display_config(config: &Config) {
    println!("\x1b[1mGitflow configuration:\x1b[0m");
    println!("  production branch:     {}", config.gitflow.production_branch);
    println!("  development branch:    {}", config.gitflow.development_branch);
    println!("  release branch prefix: {}", config.gitflow.release_branch_prefix);
    println!(
        "  version tag prefix:    {}",
        if config.gitflow.version_tag_prefix.is_empty() {
            "(none)"
        } else {
            config.gitflow.version_tag_prefix.as_str()
        }
    );
    println!("  git executable:        {}", config.tools.git);
    println!("  mvn executable:        {}", config.tools.mvn);
    if let Some(secs) = config.behavior.deadline_secs {
        println!("  deadline:              {}s", secs);
    }
}
