use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use semver::{BuildMetadata, Prerelease};
use tracing::debug;

use crate::error::{FinishError, Result};

/// Qualifier marking an in-development version.
pub const SNAPSHOT_QUALIFIER: &str = "SNAPSHOT";

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z][0-9A-Za-z.\-]*))?$").ok()
        })
        .as_ref()
}

/// A Maven-style project version: `major[.minor[.patch]][-qualifier]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub qualifier: Option<String>,
}

impl ProjectVersion {
    /// Parse a declared project version (e.g. "1.2.0", "1.2.0-SNAPSHOT", "2.1")
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let caps = version_pattern()
            .and_then(|re| re.captures(trimmed))
            .ok_or_else(|| {
                FinishError::version_computation(format!(
                    "Invalid project version: '{}' - expected MAJOR[.MINOR[.PATCH]][-QUALIFIER]",
                    raw
                ))
            })?;

        let number = |index: usize| -> Result<u64> {
            match caps.get(index) {
                Some(m) => m.as_str().parse::<u64>().map_err(|_| {
                    FinishError::version_computation(format!(
                        "Version component out of range: {}",
                        m.as_str()
                    ))
                }),
                None => Ok(0),
            }
        };

        Ok(ProjectVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            qualifier: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Next development version: minor bumped, patch reset, qualifier replaced
    /// by `SNAPSHOT` (`1.2.3` -> `1.3.0-SNAPSHOT`).
    ///
    /// Fails when the minor component is already at `u64::MAX`.
    pub fn next_snapshot(&self) -> Result<semver::Version> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            FinishError::version_computation(format!(
                "Cannot bump minor version of {}: component out of range",
                self
            ))
        })?;
        Ok(semver::Version {
            major: self.major,
            minor,
            patch: 0,
            pre: Prerelease::new(SNAPSHOT_QUALIFIER).unwrap_or(Prerelease::EMPTY),
            build: BuildMetadata::EMPTY,
        })
    }

    pub fn is_snapshot(&self) -> bool {
        self.qualifier
            .as_deref()
            .is_some_and(|q| q.eq_ignore_ascii_case(SNAPSHOT_QUALIFIER))
    }
}

impl fmt::Display for ProjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

/// Computes the next snapshot version string for `current`.
///
/// Returns `None` when `current` cannot be parsed or bumped; the error is
/// only logged.
pub fn next_snapshot_version(current: &str) -> Option<String> {
    match ProjectVersion::parse(current).and_then(|version| version.next_snapshot()) {
        Ok(next) => Some(next.to_string()),
        Err(e) => {
            debug!(version = current, error = %e, "could not compute next snapshot version");
            None
        }
    }
}
