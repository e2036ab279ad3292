//! Build tool and project metadata collaborators
//!
//! - [maven::Maven]: runs the `mvn` executable
//! - [pom::PomFile]: reads the declared version from `pom.xml`
//! - [mock::MockBuildTool]: records calls for tests

pub mod maven;
pub mod mock;
pub mod pom;

pub use maven::Maven;
pub use mock::MockBuildTool;
pub use pom::PomFile;

use crate::error::Result;

/// Project build tool operations.
pub trait BuildTool {
    /// Full build and verification (`mvn clean install`).
    fn build(&self) -> Result<()>;

    /// Set the version of every module in the project without leaving
    /// backup copies of the project descriptors.
    fn set_version(&self, version: &str) -> Result<()>;
}

/// Source of the project's currently declared version.
pub trait ProjectMetadata {
    fn current_version(&self) -> Result<String>;
}
