// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    Publication, PublishRequest, WORK_FOLDER_DEFAULT, ensure_dir, nested_folder_exclude, publish,
};
use crate::error::ErrorCategory;
use crate::git::backend::ShellBackend;
use crate::git::session::CommitIdentity;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, relative).unwrap();
}

fn bare_remote(root: &Path) -> PathBuf {
    let remote = root.join("remote.git");
    fs::create_dir_all(&remote).unwrap();
    ShellBackend::git_command(&["init", "--bare", "--quiet"], &remote).expect("init --bare");
    remote
}

fn author() -> CommitIdentity {
    CommitIdentity {
        name: "Publisher".to_string(),
        email: "publisher@example.com".to_string(),
    }
}

fn request(project: &Path, remote: &Path) -> PublishRequest {
    PublishRequest::builder()
        .with_commit_message("publish")
        .with_remote_uri(remote.to_str().unwrap())
        .with_project_dir(project)
        .with_sources(vec!["src/**".to_string()])
        .with_author(author())
        .build()
}

#[test]
fn test_request_defaults() {
    let req = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri("https://example.com/r.git")
        .with_project_dir("/work/project")
        .build();

    assert!(req.cleanup_enabled());
    assert!(!req.is_dry_run());
    assert_eq!(
        req.resolved_work_folder(),
        Path::new("/work/project").join(WORK_FOLDER_DEFAULT)
    );
    assert_eq!(
        req.resolved_meta_dir(),
        Path::new("/work/project").join("gitMeta")
    );
    assert_eq!(req.resolved_docs_dir(), None);
}

#[test]
fn test_relative_folders_resolve_against_project() {
    let req = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri("r")
        .with_project_dir("/p")
        .with_docs_dir("build/docs/javadoc")
        .with_work_folder("/tmp/abs")
        .build();
    assert_eq!(
        req.resolved_docs_dir(),
        Some(Path::new("/p").join("build/docs/javadoc"))
    );
    assert_eq!(req.resolved_work_folder(), PathBuf::from("/tmp/abs"));
}

#[test]
fn test_dry_run_disables_cleanup() {
    let req = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri("r")
        .with_project_dir("/p")
        .with_dry_run(true)
        .build();
    assert!(!req.cleanup_enabled());
}

#[test]
fn test_nested_work_folder_exclude() {
    let project = Path::new("/p");
    assert_eq!(
        nested_folder_exclude(project, &project.join("gitpublishwork")).as_deref(),
        Some("regex:gitpublishwork/.*")
    );
    assert_eq!(
        nested_folder_exclude(project, &project.join("out.d/work")).as_deref(),
        Some(r"regex:out\.d/work/.*")
    );
    assert_eq!(nested_folder_exclude(project, Path::new("/elsewhere")), None);
}

#[test]
fn test_ensure_dir_rejects_files() {
    let temp = temp_dir();
    touch(temp.path(), "plain");
    let err = ensure_dir(&temp.path().join("plain")).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);

    ensure_dir(&temp.path().join("a/b")).unwrap();
    assert!(temp.path().join("a/b").is_dir());
}

#[test]
fn test_invalid_pattern_fails_before_clone() {
    let temp = temp_dir();
    let project = temp.path().join("project");
    fs::create_dir_all(&project).unwrap();

    let req = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri(temp.path().join("missing.git").to_str().unwrap())
        .with_project_dir(&project)
        .with_sources(vec!["regex:(".to_string()])
        .build();
    let outcome = publish(&req);

    assert!(!outcome.is_success());
    assert_eq!(
        outcome.result().as_ref().unwrap_err().category(),
        ErrorCategory::Configuration
    );
    assert!(outcome.working_copy().is_none());
    assert!(!project.join(WORK_FOLDER_DEFAULT).exists());
}

#[test]
fn test_publish_then_noop() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let project = temp.path().join("project");
    touch(&project, "src/a.txt");
    touch(&project, "notes.txt");

    let first = publish(&request(&project, &remote));
    assert!(first.is_success(), "{:?}", first.result());
    assert!(matches!(
        first.result(),
        Ok(Publication::Published { .. })
    ));
    assert!(!first.retained());
    assert!(!first.working_copy().unwrap().exists(), "cleanup ran");

    let second = publish(&request(&project, &remote));
    assert!(matches!(second.result(), Ok(Publication::NoChanges)));
    assert!(second.snapshot().unwrap().is_clean());
}

#[test]
fn test_failed_clone_still_cleans_up() {
    let temp = temp_dir();
    let project = temp.path().join("project");
    touch(&project, "src/a.txt");

    let outcome = publish(&request(&project, &temp.path().join("missing.git")));
    assert_eq!(
        outcome.result().as_ref().unwrap_err().category(),
        ErrorCategory::Connectivity
    );
    assert!(!outcome.working_copy().unwrap().exists());
    assert!(outcome.cleanup_error().is_none());
}

#[test]
fn test_outcome_json_shape() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let project = temp.path().join("project");
    touch(&project, "src/a.txt");

    let req = PublishRequest::builder()
        .with_commit_message("dry")
        .with_remote_uri(remote.to_str().unwrap())
        .with_project_dir(&project)
        .with_sources(vec!["src/**".to_string()])
        .with_dry_run(true)
        .with_local_repository_folder("fixed")
        .with_author(author())
        .build();
    let outcome = publish(&req);
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(json["success"], true);
    assert_eq!(json["publication"]["kind"], "published");
    assert_eq!(json["publication"]["push"]["dry_run"], true);
    assert_eq!(json["retained"], true);
    assert!(json["error"].is_null());
    assert_eq!(json["sync"]["copied"], serde_json::json!(["src/a.txt"]));
    assert!(
        json["working_copy"]
            .as_str()
            .unwrap()
            .ends_with("fixed")
    );
    assert!(project.join(WORK_FOLDER_DEFAULT).join("fixed/src/a.txt").exists());
}
