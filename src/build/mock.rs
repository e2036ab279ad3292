use crate::build::{BuildTool, ProjectMetadata};
use crate::error::{FinishError, Result};
use std::cell::RefCell;

/// Mock build tool and metadata source for testing without Maven
pub struct MockBuildTool {
    version: RefCell<String>,
    fail_build: bool,
    fail_set_version: bool,
    calls: RefCell<Vec<String>>,
}

impl MockBuildTool {
    /// Create a mock whose project declares `version`
    pub fn new(version: impl Into<String>) -> Self {
        MockBuildTool {
            version: RefCell::new(version.into()),
            fail_build: false,
            fail_set_version: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Make `build()` fail
    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    /// Make `set_version()` fail
    pub fn failing_set_version(mut self) -> Self {
        self.fail_set_version = true;
        self
    }

    /// Calls issued so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Version currently declared by the mock project
    pub fn version(&self) -> String {
        self.version.borrow().clone()
    }

    fn failure(command: String) -> FinishError {
        FinishError::Command {
            command,
            code: Some(1),
            output: "[ERROR] BUILD FAILURE".to_string(),
        }
    }
}

impl BuildTool for MockBuildTool {
    fn build(&self) -> Result<()> {
        self.calls.borrow_mut().push("build".to_string());
        if self.fail_build {
            return Err(Self::failure("mvn clean install".to_string()));
        }
        Ok(())
    }

    fn set_version(&self, version: &str) -> Result<()> {
        self.calls
            .borrow_mut()
            .push(format!("set-version {}", version));
        if self.fail_set_version {
            return Err(Self::failure(format!("mvn versions:set -DnewVersion={}", version)));
        }
        *self.version.borrow_mut() = version.to_string();
        Ok(())
    }
}

impl ProjectMetadata for MockBuildTool {
    fn current_version(&self) -> Result<String> {
        self.calls.borrow_mut().push("read-version".to_string());
        Ok(self.version())
    }
}
