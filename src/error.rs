use std::time::Duration;

use thiserror::Error;

use crate::finisher::FinishStep;

/// Unified error type for release-finish operations
#[derive(Error, Debug)]
pub enum FinishError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Ambiguous release state: {0}")]
    AmbiguousRelease(String),

    #[error("Command `{command}` failed with {}: {output}", describe_code(.code))]
    Command {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("Version computation failed: {0}")]
    VersionComputation(String),

    #[error("Deadline exceeded after {}s", .elapsed.as_secs())]
    DeadlineExceeded { elapsed: Duration },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitflow-finish
pub type Result<T> = std::result::Result<T, FinishError>;

/// Coarse classification of a [FinishError], used for exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    AmbiguousRelease,
    ExternalCommand,
    VersionComputation,
    Deadline,
    Configuration,
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl FinishError {
    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        FinishError::Precondition(msg.into())
    }

    /// Create an ambiguous-release error with context
    pub fn ambiguous_release(msg: impl Into<String>) -> Self {
        FinishError::AmbiguousRelease(msg.into())
    }

    /// Create a version computation error with context
    pub fn version_computation(msg: impl Into<String>) -> Self {
        FinishError::VersionComputation(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        FinishError::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FinishError::Precondition(_) => ErrorKind::Precondition,
            FinishError::AmbiguousRelease(_) => ErrorKind::AmbiguousRelease,
            FinishError::Command { .. } | FinishError::Git(_) | FinishError::Io(_) => {
                ErrorKind::ExternalCommand
            }
            FinishError::VersionComputation(_) => ErrorKind::VersionComputation,
            FinishError::DeadlineExceeded { .. } => ErrorKind::Deadline,
            FinishError::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Process exit code reported by the binary for this error.
    ///
    /// `1` is left for failures outside a run that are not configuration
    /// errors (bad arguments, no repository found).
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Precondition => 2,
            ErrorKind::AmbiguousRelease => 3,
            ErrorKind::ExternalCommand => 4,
            ErrorKind::VersionComputation => 5,
            ErrorKind::Deadline => 6,
            ErrorKind::Configuration => 7,
        }
    }
}

/// A run stopped at `step` because of `error`.
///
/// Steps completed before `step` are not undone.
#[derive(Error, Debug)]
#[error("Release finish aborted at step '{step}': {error}")]
pub struct StepFailure {
    pub step: FinishStep,
    #[source]
    pub error: FinishError,
}

impl StepFailure {
    pub fn new(step: FinishStep, error: FinishError) -> Self {
        StepFailure { step, error }
    }

    pub fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}
