//! Typed boundary for running external tools.
//!
//! Collaborators describe each command as an [Invocation] and get back a
//! [CommandOutput]; nothing outside this module touches `std::process`.

use std::fmt;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{FinishError, Result};

/// Number of trailing output lines kept in a [FinishError::Command].
const OUTPUT_TAIL_LINES: usize = 20;

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Invocation {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Last lines of stdout followed by stderr, for error reports.
    pub fn tail(&self, lines: usize) -> String {
        let combined: Vec<&str> = self
            .stdout
            .lines()
            .chain(self.stderr.lines())
            .filter(|line| !line.trim().is_empty())
            .collect();
        let start = combined.len().saturating_sub(lines);
        combined[start..].join("\n")
    }
}

/// Runs `invocation` in `dir` and waits for it to exit.
///
/// Only fails when the process cannot be spawned; a non-zero exit is
/// reported through [CommandOutput::code].
pub fn run(invocation: &Invocation, dir: &Path) -> Result<CommandOutput> {
    debug!(command = %invocation, dir = %dir.display(), "running command");

    let output = Command::new(&invocation.program)
        .args(&invocation.args)
        .current_dir(dir)
        .output()
        .map_err(|e| {
            FinishError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to execute `{}`: {}", invocation, e),
            ))
        })?;

    let result = CommandOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!(command = %invocation, code = ?result.code, "command finished");
    Ok(result)
}

/// Like [run], but turns a non-zero exit into [FinishError::Command].
pub fn run_checked(invocation: &Invocation, dir: &Path) -> Result<CommandOutput> {
    let output = run(invocation, dir)?;

    if !output.success() {
        return Err(FinishError::Command {
            command: invocation.to_string(),
            code: output.code,
            output: output.tail(OUTPUT_TAIL_LINES),
        });
    }

    Ok(output)
}
