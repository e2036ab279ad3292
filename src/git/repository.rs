use crate::config::ToolsConfig;
use crate::domain::ReleaseBranchSet;
use crate::error::{FinishError, Result};
use crate::process::{self, Invocation};
use git2::{Repository as Git2Repo, StatusOptions};
use std::path::{Path, PathBuf};

/// Real repository: libgit2 for queries, the `git` executable for mutations.
///
/// Checkout, merge, tag, commit and branch deletion go through the command
/// line so hooks, merge drivers and user configuration apply as usual.
pub struct GitRepository {
    repo: Git2Repo,
    workdir: PathBuf,
    git: String,
}

impl GitRepository {
    /// Open or discover a git repository at `path`
    pub fn open<P: AsRef<Path>>(path: P, tools: &ToolsConfig) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        let workdir = repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| FinishError::config("Bare repositories are not supported"))?;

        Ok(GitRepository {
            repo,
            workdir,
            git: tools.git.clone(),
        })
    }

    /// Root of the working tree
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    fn git<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = Invocation::new(self.git.as_str()).args(args);
        process::run_checked(&invocation, &self.workdir)?;
        Ok(())
    }
}

impl super::Repository for GitRepository {
    fn has_uncommitted_changes(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(false)
            .include_ignored(false)
            .exclude_submodules(true);

        let statuses = self.repo.statuses(Some(&mut options))?;

        Ok(!statuses.is_empty())
    }

    fn list_branches(&self, prefix: &str) -> Result<ReleaseBranchSet> {
        let glob = format!("refs/heads/{}*", prefix);

        let mut names = Vec::new();
        for reference in self.repo.references_glob(&glob)? {
            let reference = reference?;
            if let Some(name) = reference.shorthand() {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(ReleaseBranchSet::new(names))
    }

    fn checkout(&self, reference: &str) -> Result<()> {
        self.git(["checkout", reference])
    }

    fn merge_no_ff(&self, reference: &str) -> Result<()> {
        let mut args = vec!["merge"];
        args.extend_from_slice(&super::MERGE_FLAGS);
        args.push(reference);
        self.git(args)
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        self.git(["tag", "-a", name, "-m", message])
    }

    fn commit_all(&self, message: &str) -> Result<()> {
        self.git(["commit", "-a", "-m", message])
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.git(["branch", "-d", name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let result = GitRepository::open(&missing, &ToolsConfig::default());
        assert!(matches!(result, Err(FinishError::Git(_))));
    }

    #[test]
    fn test_open_bare_repository_is_config_error() {
        let dir = tempfile::TempDir::new().unwrap();
        Git2Repo::init_bare(dir.path()).unwrap();

        let result = GitRepository::open(dir.path(), &ToolsConfig::default());
        assert!(matches!(result, Err(FinishError::Config(_))));
    }

    #[test]
    fn test_open_initialized_repository() {
        let dir = tempfile::TempDir::new().unwrap();
        Git2Repo::init(dir.path()).unwrap();

        let repo = GitRepository::open(dir.path(), &ToolsConfig::default()).unwrap();
        assert_eq!(
            repo.workdir().canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
