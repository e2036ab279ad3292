use crate::domain::ReleaseBranchSet;
use crate::error::{FinishError, Result};
use crate::git::Repository;
use std::cell::RefCell;

/// Mock repository for testing without actual git operations
///
/// Every issued operation is recorded as a git-like command line (`checkout
/// master`, `merge --no-ff release/1.0.0`, ...), including the one that was
/// told to fail.
pub struct MockRepository {
    branches: RefCell<Vec<String>>,
    tags: RefCell<Vec<String>>,
    dirty: bool,
    fail_on: Vec<String>,
    calls: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            branches: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            dirty: false,
            fail_on: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Add a local branch
    pub fn with_branch(self, name: impl Into<String>) -> Self {
        self.branches.borrow_mut().push(name.into());
        self
    }

    /// Add an existing tag
    pub fn with_tag(self, name: impl Into<String>) -> Self {
        self.tags.borrow_mut().push(name.into());
        self
    }

    /// Report uncommitted changes in the working tree
    pub fn with_uncommitted_changes(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Fail every recorded call that starts with `call_prefix`
    pub fn failing_on(mut self, call_prefix: impl Into<String>) -> Self {
        self.fail_on.push(call_prefix.into());
        self
    }

    /// Calls issued so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn branches(&self) -> Vec<String> {
        self.branches.borrow().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        let fails = self.fail_on.iter().any(|prefix| call.starts_with(prefix));
        self.calls.borrow_mut().push(call.clone());

        if fails {
            return Err(FinishError::Command {
                command: format!("git {}", call),
                code: Some(1),
                output: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn has_uncommitted_changes(&self) -> Result<bool> {
        self.record("status".to_string())?;
        Ok(self.dirty)
    }

    fn list_branches(&self, prefix: &str) -> Result<ReleaseBranchSet> {
        self.record(format!("for-each-ref refs/heads/{}*", prefix))?;
        let branches = self.branches.borrow();
        Ok(ReleaseBranchSet::new(
            branches.iter().filter(|name| name.starts_with(prefix)),
        ))
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.record(format!("checkout {}", reference))
    }

    fn merge_no_ff(&self, reference: &str) -> Result<()> {
        self.record(format!("merge --no-ff {}", reference))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.record(format!("tag -a {} -m {}", name, message))?;

        let mut tags = self.tags.borrow_mut();
        if tags.iter().any(|tag| tag == name) {
            return Err(FinishError::Command {
                command: format!("git tag -a {} -m {}", name, message),
                code: Some(128),
                output: format!("fatal: tag '{}' already exists", name),
            });
        }
        tags.push(name.to_string());
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.record(format!("commit -a -m {}", message))
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(format!("branch -d {}", name))?;
        self.branches.borrow_mut().retain(|branch| branch != name);
        Ok(())
    }
}
