use gitflow_finish::cli::orchestration::{
    deadline_from_now, resolve_config, run_finish_workflow, FinishWorkflowArgs, WorkflowOutcome,
};
use gitflow_finish::error::FinishError;
use gitflow_finish::finisher::FinishStep;
use std::io::Write;
use std::time::Duration;
use tempfile::{NamedTempFile, TempDir};

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_workflow_args_default() {
    let args = FinishWorkflowArgs::default();

    assert_eq!(args.config_path, None);
    assert_eq!(args.project_dir, None);
    assert!(!args.dry_run);
    assert_eq!(args.deadline, None);
    assert_eq!(args.tag_prefix, None);
}

#[test]
fn test_resolve_config_applies_overrides() {
    let file = config_file("[gitflow]\nversion_tag_prefix = \"release-\"\n");
    let project = TempDir::new().unwrap();
    let args = FinishWorkflowArgs {
        config_path: Some(file.path().to_path_buf()),
        project_dir: Some(project.path().to_path_buf()),
        tag_prefix: Some("v".to_string()),
        deadline: Some(Duration::from_secs(120)),
        ..FinishWorkflowArgs::default()
    };

    let config = resolve_config(&args).unwrap();
    assert_eq!(config.gitflow.version_tag_prefix, "v");
    assert_eq!(config.behavior.deadline_secs, Some(120));
}

#[test]
fn test_resolve_config_rejects_invalid_scheme() {
    let file = config_file("[gitflow]\nproduction_branch = \"develop\"\n");
    let project = TempDir::new().unwrap();
    let args = FinishWorkflowArgs {
        config_path: Some(file.path().to_path_buf()),
        project_dir: Some(project.path().to_path_buf()),
        ..FinishWorkflowArgs::default()
    };

    let err = resolve_config(&args).unwrap_err();
    assert!(format!("{:#}", err).contains("production_branch"));
}

#[test]
fn test_workflow_outside_repository_is_error() {
    let file = config_file("");
    let project = TempDir::new().unwrap();
    let args = FinishWorkflowArgs {
        config_path: Some(file.path().to_path_buf()),
        project_dir: Some(project.path().join("missing")),
        ..FinishWorkflowArgs::default()
    };

    let result = run_finish_workflow(&args, |_| {});
    assert!(result.is_err());
}

#[test]
fn test_deadline_beyond_clock_range_is_ignored() {
    assert!(deadline_from_now(Duration::from_secs(60)).is_some());
    assert!(deadline_from_now(Duration::from_secs(u64::MAX)).is_none());
}

#[test]
fn test_workflow_with_huge_deadline_reaches_finisher() {
    let file = config_file("");
    let project = TempDir::new().unwrap();
    git2::Repository::init(project.path()).unwrap();
    let args = FinishWorkflowArgs {
        config_path: Some(file.path().to_path_buf()),
        project_dir: Some(project.path().to_path_buf()),
        dry_run: true,
        deadline: Some(Duration::from_secs(u64::MAX)),
        ..FinishWorkflowArgs::default()
    };

    let outcome = run_finish_workflow(&args, |_| {}).unwrap();
    match outcome {
        WorkflowOutcome::Failed(failure) => {
            assert_eq!(failure.step, FinishStep::ResolveReleaseBranch);
            assert!(matches!(failure.error, FinishError::AmbiguousRelease(_)));
        }
        other => panic!("Expected a failed resolve, got {:?}", other),
    }
}
