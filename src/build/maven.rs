use std::path::{Path, PathBuf};

use crate::build::BuildTool;
use crate::config::ToolsConfig;
use crate::error::Result;
use crate::process::{self, Invocation};

/// Maven driven through its command line.
pub struct Maven {
    executable: String,
    versions_plugin: String,
    project_dir: PathBuf,
}

impl Maven {
    pub fn new(project_dir: impl Into<PathBuf>, tools: &ToolsConfig) -> Self {
        Maven {
            executable: tools.mvn.clone(),
            versions_plugin: tools.versions_plugin.clone(),
            project_dir: project_dir.into(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn build_invocation(&self) -> Invocation {
        Invocation::new(self.executable.as_str()).args(["clean", "install"])
    }

    pub fn set_version_invocation(&self, version: &str) -> Invocation {
        Invocation::new(self.executable.as_str())
            .arg(format!("{}:set", self.versions_plugin))
            .arg(format!("-DnewVersion={}", version))
            .arg("-DgenerateBackupPoms=false")
    }
}

impl BuildTool for Maven {
    fn build(&self) -> Result<()> {
        process::run_checked(&self.build_invocation(), &self.project_dir)?;
        Ok(())
    }

    fn set_version(&self, version: &str) -> Result<()> {
        process::run_checked(&self.set_version_invocation(version), &self.project_dir)?;
        Ok(())
    }
}
