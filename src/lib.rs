pub mod build;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod finisher;
pub mod git;
pub mod process;
pub mod ui;

pub use error::{FinishError, Result, StepFailure};
pub use finisher::{FinishReport, FinishStep, ReleaseFinisher};
