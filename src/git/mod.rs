//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the version-control
//! operations the release finish needs, allowing for a real implementation and
//! a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait, with one method per
//! logical operation. The concrete implementations are:
//!
//! - [repository::GitRepository]: `git2` for read-only queries, the `git`
//!   executable for everything that changes the working tree or refs
//! - [mock::MockRepository]: an in-memory recorder for tests
//!
//! # Usage
//!
//! The finisher depends on the [Repository] trait only, so it never builds
//! git argument lists itself.
//!
//! ```rust
//! # use gitflow_finish::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> gitflow_finish::Result<()> {
//! if !repo.has_uncommitted_changes()? {
//!     let branches = repo.list_branches("release/")?;
//!     println!("{:?}", branches.names());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::GitRepository;

use crate::domain::ReleaseBranchSet;
use crate::error::Result;

/// Flags passed to `git merge` for every release merge.
pub const MERGE_FLAGS: [&str; 2] = ["--no-ff", "--no-edit"];

/// Version-control operations used by the release finish.
///
/// All calls block until the underlying operation completes. Implementations
/// map a failed operation to [crate::error::FinishError::Command] (or
/// [crate::error::FinishError::Git] for libgit2 failures) and never retry.
pub trait Repository {
    /// Whether tracked files have staged or unstaged modifications.
    ///
    /// Untracked files do not count.
    fn has_uncommitted_changes(&self) -> Result<bool>;

    /// Local branches whose names start with `prefix`
    /// (`git for-each-ref refs/heads/<prefix>*`).
    fn list_branches(&self, prefix: &str) -> Result<ReleaseBranchSet>;

    /// Check out a branch or other ref.
    fn checkout(&self, reference: &str) -> Result<()>;

    /// Merge `reference` into the current branch, always creating a merge commit.
    fn merge_no_ff(&self, reference: &str) -> Result<()>;

    /// Create an annotated tag on the current HEAD.
    ///
    /// Fails if the tag already exists.
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Commit all modified tracked files (`git commit -a`).
    fn commit_all(&self, message: &str) -> Result<()>;

    /// Delete a local branch without forcing (`git branch -d`).
    fn delete_branch(&self, name: &str) -> Result<()>;
}
