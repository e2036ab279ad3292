// tests/integration_test.rs
use std::fs;
use std::path::Path;
use std::process::Command;

use gitflow_finish::build::{BuildTool, PomFile, ProjectMetadata};
use gitflow_finish::config::{GitFlowConfig, ToolsConfig};
use gitflow_finish::error::FinishError;
use gitflow_finish::finisher::{FinishStep, ReleaseFinisher, BUMP_COMMIT_MESSAGE};
use gitflow_finish::git::{GitRepository, Repository};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_gitflow-finish");

fn pom(version: &str) -> String {
    format!(
        r#"<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>demo</artifactId>
  <version>{}</version>
</project>
"#,
        version
    )
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// master and develop at the initial commit, release/1.0.0 with the pom at 1.0.0.
fn release_repository() -> TempDir {
    let dir = TempDir::new().unwrap();
    let path = dir.path();

    git(path, &["init", "-q"]);
    git(path, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    git(path, &["config", "user.name", "Release Bot"]);
    git(path, &["config", "user.email", "release@example.com"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    git(path, &["config", "tag.gpgsign", "false"]);

    fs::write(path.join("pom.xml"), pom("1.0.0-SNAPSHOT")).unwrap();
    git(path, &["add", "pom.xml"]);
    git(path, &["commit", "-q", "-m", "initial"]);
    git(path, &["branch", "develop"]);

    git(path, &["checkout", "-q", "-b", "release/1.0.0", "develop"]);
    fs::write(path.join("pom.xml"), pom("1.0.0")).unwrap();
    git(path, &["commit", "-q", "-a", "-m", "release 1.0.0"]);
    git(path, &["checkout", "-q", "develop"]);

    dir
}

/// Build tool that skips the build and rewrites the pom version in place.
struct PomRewriter<'a> {
    pom: &'a PomFile,
}

impl BuildTool for PomRewriter<'_> {
    fn build(&self) -> gitflow_finish::Result<()> {
        Ok(())
    }

    fn set_version(&self, version: &str) -> gitflow_finish::Result<()> {
        let current = self.pom.current_version()?;
        let content = fs::read_to_string(self.pom.path())?;
        let updated = content.replace(
            &format!("<version>{}</version>", current),
            &format!("<version>{}</version>", version),
        );
        fs::write(self.pom.path(), updated)?;
        Ok(())
    }
}

#[test]
fn test_help_describes_tool() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gitflow-finish"));
    assert!(stdout.contains("--dry-run"));
}

#[test]
fn test_version_flag() {
    let output = Command::new(BIN)
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_finish_against_real_repository() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = release_repository();
    let path = dir.path();

    let tools = ToolsConfig::default();
    let repo = GitRepository::open(path, &tools).unwrap();
    let pom = PomFile::in_dir(path);
    let build = PomRewriter { pom: &pom };
    let config = GitFlowConfig {
        version_tag_prefix: "v".to_string(),
        ..GitFlowConfig::default()
    };

    let report = ReleaseFinisher::new(&repo, &build, &pom, &config)
        .finish()
        .expect("finish should succeed");

    assert_eq!(report.tag, "v1.0.0");
    assert_eq!(report.next_version, "1.1.0-SNAPSHOT");

    // Annotated tag on a merge commit of production.
    assert_eq!(git(path, &["cat-file", "-t", "v1.0.0"]), "tag");
    assert_eq!(git(path, &["rev-parse", "v1.0.0^{commit}"]), git(path, &["rev-parse", "master"]));
    let master_parents = git(path, &["rev-list", "--parents", "-n", "1", "master"]);
    assert_eq!(master_parents.split_whitespace().count(), 3);

    // Development holds the next snapshot, committed.
    assert_eq!(git(path, &["rev-parse", "--abbrev-ref", "HEAD"]), "develop");
    assert_eq!(git(path, &["log", "-1", "--format=%s"]), BUMP_COMMIT_MESSAGE);
    assert_eq!(pom.current_version().unwrap(), "1.1.0-SNAPSHOT");
    assert!(!repo.has_uncommitted_changes().unwrap());

    // Release branch removed; finishing again has nothing to resolve.
    assert!(repo.list_branches("release/").unwrap().is_empty());
    let failure = ReleaseFinisher::new(&repo, &build, &pom, &config)
        .finish()
        .unwrap_err();
    assert_eq!(failure.step, FinishStep::ResolveReleaseBranch);
}

#[test]
fn test_tracked_changes_block_but_untracked_do_not() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = release_repository();
    let path = dir.path();
    let repo = GitRepository::open(path, &ToolsConfig::default()).unwrap();

    fs::write(path.join("notes.txt"), "scratch").unwrap();
    assert!(!repo.has_uncommitted_changes().unwrap());

    fs::write(path.join("pom.xml"), pom("9.9.9")).unwrap();
    assert!(repo.has_uncommitted_changes().unwrap());

    let pom_file = PomFile::in_dir(path);
    let build = PomRewriter { pom: &pom_file };
    let config = GitFlowConfig::default();
    let failure = ReleaseFinisher::new(&repo, &build, &pom_file, &config)
        .finish()
        .unwrap_err();
    assert_eq!(failure.step, FinishStep::PreflightCheck);
    assert!(matches!(failure.error, FinishError::Precondition(_)));
    assert_eq!(git(path, &["rev-parse", "--abbrev-ref", "HEAD"]), "develop");
}

#[test]
fn test_merge_conflict_stops_at_production_merge() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = release_repository();
    let path = dir.path();

    git(path, &["checkout", "-q", "master"]);
    fs::write(path.join("pom.xml"), pom("0.9.9-hotfix")).unwrap();
    git(path, &["commit", "-q", "-a", "-m", "conflicting change"]);
    git(path, &["checkout", "-q", "develop"]);

    let repo = GitRepository::open(path, &ToolsConfig::default()).unwrap();
    let pom_file = PomFile::in_dir(path);
    let build = PomRewriter { pom: &pom_file };
    let config = GitFlowConfig::default();

    let failure = ReleaseFinisher::new(&repo, &build, &pom_file, &config)
        .finish()
        .unwrap_err();

    assert_eq!(failure.step, FinishStep::MergeToProduction);
    assert!(matches!(failure.error, FinishError::Command { .. }));
    assert!(git(path, &["tag", "-l"]).is_empty());
    assert!(!git(path, &["branch", "--list", "release/1.0.0"]).is_empty());
}

#[test]
fn test_binary_dry_run_makes_no_changes() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = release_repository();
    let path = dir.path();
    let config = path.join("gitflow.toml");
    fs::write(&config, "[gitflow]\nversion_tag_prefix = \"v\"\n").unwrap();
    let head_before = git(path, &["rev-parse", "HEAD"]);

    let output = Command::new(BIN)
        .args(["--dry-run", "-c"])
        .arg(&config)
        .arg("-C")
        .arg(path)
        .output()
        .expect("Failed to execute command");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("git tag -a v1.0.0"));
    assert!(stdout.contains("git merge --no-ff --no-edit release/1.0.0"));
    assert_eq!(git(path, &["rev-parse", "HEAD"]), head_before);
    assert!(git(path, &["tag", "-l"]).is_empty());
}

#[test]
fn test_binary_exit_code_for_missing_release_branch() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }
    let dir = release_repository();
    let path = dir.path();
    git(path, &["branch", "-D", "release/1.0.0"]);
    let config = path.join("gitflow.toml");
    fs::write(&config, "").unwrap();

    let output = Command::new(BIN)
        .arg("-c")
        .arg(&config)
        .arg("-C")
        .arg(path)
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("resolve-release-branch"));
}

#[test]
fn test_binary_exit_code_for_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gitflow.toml");
    fs::write(&config, "[gitflow]\nproduction_branch = \"develop\"\n").unwrap();

    let output = Command::new(BIN)
        .arg("-c")
        .arg(&config)
        .arg("-C")
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(7));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("production_branch"));
}

#[test]
fn test_binary_exit_code_for_malformed_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("gitflow.toml");
    fs::write(&config, "[gitflow\nproduction_branch = ").unwrap();

    let output = Command::new(BIN)
        .arg("--show-config")
        .arg("-c")
        .arg(&config)
        .arg("-C")
        .arg(dir.path())
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(7));
}
