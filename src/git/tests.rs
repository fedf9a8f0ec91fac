// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{ErrorCategory, GitError, PublishError};
use crate::git::backend::ShellBackend;
use crate::git::credentials::{self, INLINE_HELPER, PASSWORD_ENV, USERNAME_ENV};
use crate::git::{
    AmbientCredentials, CommitIdentity, CredentialsProvider, RepositorySession, SessionState,
    StaticCredentials, StatusCategories, StatusSnapshot,
};
use crate::select::RelativePath;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn identity() -> Option<CommitIdentity> {
    Some(CommitIdentity {
        name: "Test".to_string(),
        email: "test@example.com".to_string(),
    })
}

/// Create an empty bare repository and return its path.
fn bare_remote(root: &Path) -> PathBuf {
    let remote = root.join("remote.git");
    fs::create_dir_all(&remote).unwrap();
    ShellBackend::git_command(&["init", "--bare", "--quiet"], &remote).expect("init --bare");
    remote
}

fn remote_refs(remote: &Path) -> String {
    ShellBackend::git_command(&["for-each-ref", "--format=%(refname)"], remote).unwrap()
}

fn clone_session(root: &Path, remote: &Path) -> RepositorySession {
    RepositorySession::clone_remote(
        remote.to_str().unwrap(),
        &root.join("work"),
        Arc::new(AmbientCredentials),
        identity(),
    )
    .expect("clone")
}

// --- Status parsing ---

#[test]
fn test_porcelain_categories() {
    let entries = [
        "A  added.txt",
        "M  changed.txt",
        "D  removed.txt",
        " D missing.txt",
        " M modified.txt",
        "AM added-then-modified.txt",
        "UU conflict.txt",
        "?? new dir/file.txt",
        "!! build/out.o",
    ]
    .join("\0");
    let folders = "?? new dir/\0?? loose.txt\0";

    let snapshot = StatusSnapshot::from_porcelain(&entries, folders).unwrap();

    insta::assert_debug_snapshot!(snapshot.render_lines(), @r##"
    [
        "A added-then-modified.txt",
        "A added.txt",
        "C changed.txt",
        "X conflict.txt",
        "i build/out.o",
        "# missing.txt",
        "M added-then-modified.txt",
        "M modified.txt",
        "R removed.txt",
        "U added-then-modified.txt",
        "U added.txt",
        "U changed.txt",
        "U conflict.txt",
        "U missing.txt",
        "U modified.txt",
        "U removed.txt",
        "u new dir/file.txt",
        "f new dir",
    ]
    "##);
    insta::assert_snapshot!(
        snapshot.summary(),
        @"2 added, 1 changed, 1 conflicting, 1 ignored, 1 missing, 2 modified, 1 removed, 7 uncommitted, 1 untracked, 1 untracked folders"
    );
}

#[test]
fn test_empty_porcelain_is_clean() {
    let snapshot = StatusSnapshot::from_porcelain("", "").unwrap();
    assert!(snapshot.is_clean());
    assert_eq!(snapshot.summary(), "clean");
    assert!(snapshot.render_lines().is_empty());
    assert_eq!(snapshot.categories(), StatusCategories::empty());
}

#[test]
fn test_malformed_porcelain_is_rejected() {
    let err = StatusSnapshot::from_porcelain("XYZ", "").unwrap_err();
    assert!(err.contains("malformed"), "{err}");
}

#[test]
fn test_category_groups() {
    let snapshot = StatusSnapshot::from_porcelain("?? a\0 M b\0 D c\0", "").unwrap();

    assert!(!snapshot.has_staged());
    let to_add: Vec<String> = snapshot
        .paths(StatusCategories::TO_ADD)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(to_add, ["a", "b"]);
    assert_eq!(
        snapshot.paths(StatusCategories::TO_REMOVE),
        [RelativePath::from("c")].into_iter().collect::<BTreeSet<_>>()
    );
    assert!(
        snapshot
            .categories()
            .contains(StatusCategories::UNTRACKED | StatusCategories::MISSING)
    );
}

#[test]
fn test_snapshot_serializes_with_category_names() {
    let snapshot = StatusSnapshot::from_porcelain("A  x\0", "").unwrap();
    let json = serde_json::to_value(&snapshot).unwrap();
    assert_eq!(json["added"], serde_json::json!(["x"]));
    assert_eq!(json["uncommitted"], serde_json::json!(["x"]));
    assert_eq!(json["untracked_folders"], serde_json::json!([]));
}

// --- Credentials ---

#[test]
fn test_credentials_precedence() {
    let handle: Arc<dyn CredentialsProvider> = Arc::new(StaticCredentials::new("h", "hp"));

    let chosen = credentials::resolve(Some(handle), Some("u"), Some("p"));
    assert_eq!(chosen.credentials().unwrap().username(), "h");

    let chosen = credentials::resolve(None, Some("u"), Some("p"));
    let creds = chosen.credentials().unwrap();
    assert_eq!((creds.username(), creds.password()), ("u", "p"));

    let chosen = credentials::resolve(None, Some("token"), None);
    assert_eq!(chosen.credentials().unwrap().password(), "");

    assert!(credentials::resolve(None, None, Some("p")).credentials().is_none());
    assert!(credentials::resolve(None, Some(""), None).credentials().is_none());
}

#[test]
fn test_password_never_in_debug() {
    let creds = StaticCredentials::new("alice", "s3cret");
    let rendered = format!("{creds:?}");
    assert!(!rendered.contains("s3cret"), "{rendered}");
    assert!(rendered.contains("[hidden]"));
}

#[test]
fn test_inline_helper_reads_environment() {
    assert!(INLINE_HELPER.starts_with("credential.helper=!"));
    assert!(INLINE_HELPER.contains(USERNAME_ENV));
    assert!(INLINE_HELPER.contains(PASSWORD_ENV));
}

// --- Session ---

#[test]
fn test_session_lifecycle_against_bare_remote() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let mut session = clone_session(temp.path(), &remote);
    assert_eq!(session.state(), SessionState::Cloned);

    let clean = session.verify_clean_clone().unwrap();
    assert!(clean.is_clean());
    assert_eq!(session.state(), SessionState::Clean);

    fs::write(session.workdir().join("hello.txt"), "hi").unwrap();
    let dirty = session.status().unwrap();
    assert_eq!(session.state(), SessionState::Dirty);

    session.stage_changes(&dirty).unwrap();
    assert_eq!(session.state(), SessionState::Staged);

    let commit = session.commit("publish").unwrap();
    assert_eq!(commit.len(), 40);
    assert_eq!(session.state(), SessionState::Committed);

    let report = session.push(false).unwrap();
    assert!(!report.dry_run);
    assert_eq!(session.state(), SessionState::Pushed);
    assert!(!remote_refs(&remote).is_empty());
}

#[test]
fn test_dry_run_push_transmits_nothing() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let mut session = clone_session(temp.path(), &remote);

    fs::write(session.workdir().join("a.txt"), "a").unwrap();
    let dirty = session.status().unwrap();
    session.stage_changes(&dirty).unwrap();
    session.commit("dry").unwrap();

    let report = session.push(true).unwrap();
    assert!(report.dry_run);
    assert!(remote_refs(&remote).is_empty(), "dry run created remote refs");
}

#[test]
fn test_commit_without_staged_changes() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let mut session = clone_session(temp.path(), &remote);

    let err = session.commit("empty").unwrap_err();
    assert!(matches!(&err, PublishError::Git(_)));
    assert_eq!(err.category(), ErrorCategory::RepositoryState);
    assert!(err.to_string().contains("nothing to commit"), "{err}");
}

#[test]
fn test_dirty_clone_is_protocol_violation() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());
    let mut session = clone_session(temp.path(), &remote);
    fs::write(session.workdir().join("stray.txt"), "x").unwrap();

    let err = session.verify_clean_clone().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ProtocolViolation);
    assert_eq!(session.state(), SessionState::Dirty);
}

#[test]
fn test_clone_of_missing_remote_is_connectivity_error() {
    let temp = temp_dir();
    let err = RepositorySession::clone_remote(
        temp.path().join("nope.git").to_str().unwrap(),
        &temp.path().join("work"),
        Arc::new(AmbientCredentials),
        None,
    )
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Connectivity);
}

fn commit_file(session: &mut RepositorySession, name: &str, message: &str) -> String {
    fs::write(session.workdir().join(name), message).unwrap();
    let dirty = session.status().unwrap();
    session.stage_changes(&dirty).unwrap();
    session.commit(message).unwrap()
}

#[test]
fn test_rejected_push_keeps_local_commit() {
    let temp = temp_dir();
    let remote = bare_remote(temp.path());

    let mut first = clone_session(temp.path(), &remote);
    commit_file(&mut first, "base.txt", "base");
    first.push(false).unwrap();

    let mut ahead = RepositorySession::clone_remote(
        remote.to_str().unwrap(),
        &temp.path().join("ahead"),
        Arc::new(AmbientCredentials),
        identity(),
    )
    .unwrap();
    commit_file(&mut ahead, "ahead.txt", "ahead");
    ahead.push(false).unwrap();

    let local = commit_file(&mut first, "behind.txt", "behind");
    let err = first.push(false).unwrap_err();

    assert!(
        matches!(&err, PublishError::Git(git) if matches!(**git, GitError::PushFailed { .. })),
        "{err:?}"
    );
    assert_eq!(err.category(), ErrorCategory::Connectivity);
    assert_eq!(first.state(), SessionState::Committed);

    let head = ShellBackend::git_command(&["rev-parse", "HEAD"], first.workdir()).unwrap();
    assert_eq!(head, local);
}
