//! Domain logic - pure release rules independent of git and the build tool

pub mod branch;
pub mod version;

pub use branch::{ReleaseBranch, ReleaseBranchSet};
pub use version::{next_snapshot_version, ProjectVersion};
