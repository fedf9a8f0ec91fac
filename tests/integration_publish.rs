// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the publish engine.
//!
//! Every test publishes into a local bare repository.

use git_publish::error::ErrorCategory;
use git_publish::git::CommitIdentity;
use git_publish::publish::{Publication, PublishRequest, publish};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

/// Run git in `cwd` and return trimmed stdout, panicking on failure.
fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, format!("content of {relative}\n")).unwrap();
}

struct Fixture {
    _temp: TempDir,
    remote: PathBuf,
    project: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = temp_dir();
        let remote = temp.path().join("remote.git");
        fs::create_dir_all(&remote).unwrap();
        git(&["init", "--bare", "--quiet"], &remote);

        let project = temp.path().join("project");
        touch(&project, "src/main/App.java");
        touch(&project, "src/main/util/Strings.java");
        touch(&project, "src/test/AppTest.java");
        touch(&project, "build.gradle");
        touch(&project, "gitMeta/README.md");
        touch(&project, "gitMeta/LICENSE");

        Self {
            _temp: temp,
            remote,
            project,
        }
    }

    fn request(&self, message: &str) -> PublishRequest {
        PublishRequest::builder()
            .with_commit_message(message)
            .with_remote_uri(self.remote.to_str().unwrap())
            .with_project_dir(&self.project)
            .with_sources(vec!["src/main/**".to_string()])
            .with_author(CommitIdentity {
                name: "Publisher".to_string(),
                email: "publisher@example.com".to_string(),
            })
            .build()
    }

    fn remote_files(&self) -> Vec<String> {
        let listing = git(&["ls-tree", "-r", "--name-only", "HEAD"], &self.remote);
        listing.lines().map(ToString::to_string).collect()
    }

    fn remote_log(&self) -> Vec<String> {
        git(&["log", "--format=%s", "HEAD"], &self.remote)
            .lines()
            .map(ToString::to_string)
            .collect()
    }

    fn remote_refs(&self) -> String {
        git(&["for-each-ref"], &self.remote)
    }
}

#[test]
fn publish_pushes_selected_files_and_meta() {
    let f = Fixture::new();
    let outcome = publish(&f.request("Publish 1.0"));
    assert!(outcome.is_success(), "{:?}", outcome.result());

    insta::assert_debug_snapshot!(f.remote_files(), @r#"
    [
        "LICENSE",
        "README.md",
        "src/main/App.java",
        "src/main/util/Strings.java",
    ]
    "#);
    assert_eq!(f.remote_log(), vec!["Publish 1.0"]);

    let Ok(Publication::Published { commit, push }) = outcome.result() else {
        panic!("expected a publication");
    };
    assert_eq!(commit.len(), 40);
    assert!(!push.dry_run);
    assert!(!push.has_rejections());
}

#[test]
fn unchanged_tree_is_a_noop() {
    let f = Fixture::new();
    assert!(publish(&f.request("first")).is_success());

    let second = publish(&f.request("second"));
    assert!(matches!(second.result(), Ok(Publication::NoChanges)));
    assert_eq!(f.remote_log(), vec!["first"]);
    assert!(second.diagnostic()[0].contains("no changes"));
}

#[test]
fn removed_project_file_is_removed_remotely() {
    let f = Fixture::new();
    assert!(publish(&f.request("first")).is_success());

    fs::remove_file(f.project.join("src/main/util/Strings.java")).unwrap();
    touch(&f.project, "src/main/Added.java");
    let outcome = publish(&f.request("second"));
    assert!(outcome.is_success(), "{:?}", outcome.result());

    let sync = outcome.sync_report().unwrap();
    assert_eq!(sync.deleted.len(), 1);
    assert_eq!(sync.deleted[0].as_str(), "src/main/util/Strings.java");
    assert_eq!(sync.pruned_dirs, 1);

    insta::assert_debug_snapshot!(f.remote_files(), @r#"
    [
        "LICENSE",
        "README.md",
        "src/main/Added.java",
        "src/main/App.java",
    ]
    "#);
    assert_eq!(f.remote_log(), vec!["second", "first"]);
}

#[test]
fn dry_run_commits_locally_only() {
    let f = Fixture::new();
    let request = PublishRequest::builder()
        .with_commit_message("dry")
        .with_remote_uri(f.remote.to_str().unwrap())
        .with_project_dir(&f.project)
        .with_sources(vec!["src/main/**".to_string()])
        .with_dry_run(true)
        .with_author(CommitIdentity {
            name: "Publisher".to_string(),
            email: "publisher@example.com".to_string(),
        })
        .build();

    let outcome = publish(&request);
    assert!(outcome.is_success(), "{:?}", outcome.result());
    assert!(outcome.retained());
    assert!(f.remote_refs().is_empty(), "remote must not change");

    let working_copy = outcome.working_copy().unwrap();
    assert!(working_copy.starts_with(f.project.join("gitpublishwork")));
    assert_eq!(git(&["log", "--format=%s"], working_copy), "dry");
}

#[test]
fn invalid_pattern_is_a_configuration_error() {
    let f = Fixture::new();
    let request = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri(f.remote.to_str().unwrap())
        .with_project_dir(&f.project)
        .with_ignores(vec!["regex:[".to_string()])
        .build();

    let outcome = publish(&request);
    let err = outcome.result().as_ref().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(f.remote_refs().is_empty());
}

#[test]
fn unreachable_remote_is_a_connectivity_error() {
    let f = Fixture::new();
    let request = PublishRequest::builder()
        .with_commit_message("m")
        .with_remote_uri(f.project.join("no-such-remote.git").to_str().unwrap())
        .with_project_dir(&f.project)
        .with_sources(vec!["src/**".to_string()])
        .build();

    let outcome = publish(&request);
    assert_eq!(
        outcome.result().as_ref().unwrap_err().category(),
        ErrorCategory::Connectivity
    );
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["category"], "connectivity");
}

#[test]
fn work_folder_inside_project_is_never_published() {
    let f = Fixture::new();
    let request = PublishRequest::builder()
        .with_commit_message("everything")
        .with_remote_uri(f.remote.to_str().unwrap())
        .with_project_dir(&f.project)
        .with_sources(vec!["**".to_string()])
        .with_local_repository_folder("kept")
        .with_must_cleanup(false)
        .with_author(CommitIdentity {
            name: "Publisher".to_string(),
            email: "publisher@example.com".to_string(),
        })
        .build();

    let outcome = publish(&request);
    assert!(outcome.is_success(), "{:?}", outcome.result());
    assert!(outcome.retained());
    assert!(
        f.remote_files()
            .iter()
            .all(|path| !path.starts_with("gitpublishwork/"))
    );
    assert!(f.remote_files().contains(&"build.gradle".to_string()));
}
