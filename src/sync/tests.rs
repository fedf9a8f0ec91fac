// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{DOCS_SUBFOLDER, TreeSynchronizer};
use crate::select::{FileSelector, RelativePath};
use crate::utility::fs::walk::{WalkOptions, list_files};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn touch(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, relative).unwrap();
}

fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = list_files(root, &WalkOptions::for_working_copy())
        .unwrap()
        .iter()
        .map(|p| RelativePath::from_path(p).to_string())
        .collect();
    files.sort();
    files
}

struct Layout {
    _temp: TempDir,
    project: std::path::PathBuf,
    dest: std::path::PathBuf,
}

fn layout() -> Layout {
    let temp = temp_dir();
    let project = temp.path().join("project");
    let dest = temp.path().join("clone");
    touch(&project, "src/a.txt");
    touch(&project, "src/nested/b.txt");
    touch(&project, "docs/guide.md");
    touch(&project, "build.gradle");
    touch(&dest, ".git/HEAD");
    Layout {
        _temp: temp,
        project,
        dest,
    }
}

fn synchronizer(project: &Path, includes: &[&str], excludes: &[&str]) -> TreeSynchronizer {
    TreeSynchronizer::builder()
        .with_project_root(project)
        .with_selector(FileSelector::from_patterns(includes, excludes).unwrap())
        .build()
}

#[test]
fn test_copies_selected_files_only() {
    let l = layout();
    let report = synchronizer(&l.project, &["src/**", "docs/**"], &["docs/**"])
        .synchronize(&l.dest)
        .unwrap();

    insta::assert_debug_snapshot!(tree(&l.dest), @r#"
    [
        "src/a.txt",
        "src/nested/b.txt",
    ]
    "#);
    assert_eq!(report.copied.len(), 2);
    assert!(report.deleted.is_empty());
    assert!(l.dest.join(".git/HEAD").exists(), "metadata untouched");
}

#[test]
fn test_empty_includes_copy_nothing_from_project() {
    let l = layout();
    let report = synchronizer(&l.project, &[], &[]).synchronize(&l.dest).unwrap();
    assert!(report.copied.is_empty());
    assert!(tree(&l.dest).is_empty());
}

#[test]
fn test_meta_and_docs_roots() {
    let l = layout();
    let meta = l.project.join("gitMeta");
    let docs = l.project.join("build/docs");
    touch(&meta, "README.md");
    touch(&meta, "LICENSE");
    touch(&meta, "secret.key");
    touch(&docs, "index.html");
    touch(&docs, "pkg/Type.html");

    let sync = TreeSynchronizer::builder()
        .with_project_root(&l.project)
        .with_selector(FileSelector::from_patterns(&["src/a.txt"], &["*.key"]).unwrap())
        .with_meta_root(&meta)
        .with_docs_root(&docs)
        .build();
    sync.synchronize(&l.dest).unwrap();

    insta::assert_debug_snapshot!(tree(&l.dest), @r#"
    [
        "LICENSE",
        "README.md",
        "javadoc/index.html",
        "javadoc/pkg/Type.html",
        "src/a.txt",
    ]
    "#);
    assert!(tree(&l.dest).iter().all(|p| !p.ends_with(".key")));
    assert_eq!(DOCS_SUBFOLDER, "javadoc");
}

#[test]
fn test_missing_optional_roots_are_skipped() {
    let l = layout();
    let sync = TreeSynchronizer::builder()
        .with_project_root(&l.project)
        .with_selector(FileSelector::from_patterns(&["build.gradle"], &[]).unwrap())
        .with_meta_root(l.project.join("no-meta"))
        .with_docs_root(l.project.join("no-docs"))
        .build();
    let report = sync.synchronize(&l.dest).unwrap();
    assert_eq!(report.copied.len(), 1);
}

#[test]
fn test_dangling_files_are_deleted_and_dirs_pruned() {
    let l = layout();
    touch(&l.dest, "old/stale/file.txt");
    touch(&l.dest, "src/removed.txt");
    touch(&l.dest, "ignored.log");

    let report = synchronizer(&l.project, &["src/**"], &["*.log"])
        .synchronize(&l.dest)
        .unwrap();

    let deleted: Vec<&str> = report.deleted.iter().map(RelativePath::as_str).collect();
    insta::assert_debug_snapshot!(deleted, @r#"
    [
        "old/stale/file.txt",
        "src/removed.txt",
    ]
    "#);
    assert_eq!(report.pruned_dirs, 2);
    assert!(!l.dest.join("old").exists());
    assert!(l.dest.join("ignored.log").exists(), "excluded files are left alone");
    assert!(l.dest.join(".git/HEAD").exists());
}

#[test]
fn test_mirror_invariant_over_runs() {
    let l = layout();
    let sync = synchronizer(&l.project, &["src/**"], &[]);
    sync.synchronize(&l.dest).unwrap();

    fs::remove_file(l.project.join("src/nested/b.txt")).unwrap();
    touch(&l.project, "src/c.txt");
    let report = sync.synchronize(&l.dest).unwrap();

    let copied: Vec<String> = report.copied.iter().map(ToString::to_string).collect();
    assert_eq!(tree(&l.dest), copied);
    assert_eq!(report.deleted, vec![RelativePath::from("src/nested/b.txt")]);
}

#[test]
fn test_copy_keeps_mtime_and_overwrites() {
    let l = layout();
    let past = SystemTime::UNIX_EPOCH + Duration::from_secs(1_500_000_000);
    fs::OpenOptions::new()
        .write(true)
        .open(l.project.join("src/a.txt"))
        .unwrap()
        .set_modified(past)
        .unwrap();
    touch(&l.dest, "src/a.txt");
    fs::write(l.dest.join("src/a.txt"), "stale").unwrap();

    synchronizer(&l.project, &["src/a.txt"], &[])
        .synchronize(&l.dest)
        .unwrap();

    let copied = l.dest.join("src/a.txt");
    assert_eq!(fs::read_to_string(&copied).unwrap(), "src/a.txt");
    assert_eq!(fs::metadata(&copied).unwrap().modified().unwrap(), past);
}

#[test]
fn test_missing_project_root_fails() {
    let l = layout();
    let err = synchronizer(&l.project.join("gone"), &["**"], &[])
        .synchronize(&l.dest)
        .unwrap_err();
    assert_eq!(err.category(), crate::error::ErrorCategory::Io);
}

#[test]
fn test_read_only_sources_survive_repeated_runs() {
    let l = layout();
    let source = l.project.join("src/a.txt");
    let mut permissions = fs::metadata(&source).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&source, permissions).unwrap();

    let sync = synchronizer(&l.project, &["src/**"], &[]);
    sync.synchronize(&l.dest).unwrap();
    let report = sync.synchronize(&l.dest).unwrap();

    assert!(report.copied.contains(&RelativePath::from("src/a.txt")));
    assert_eq!(fs::read_to_string(l.dest.join("src/a.txt")).unwrap(), "src/a.txt");
}

#[cfg(unix)]
#[test]
fn test_linked_folder_is_copied_as_folder() {
    let l = layout();
    touch(&l.project, "shared/util.txt");
    std::os::unix::fs::symlink(l.project.join("shared"), l.project.join("src/linked")).unwrap();

    synchronizer(&l.project, &["src/**"], &[])
        .synchronize(&l.dest)
        .unwrap();

    insta::assert_debug_snapshot!(tree(&l.dest), @r#"
    [
        "src/a.txt",
        "src/linked/util.txt",
        "src/nested/b.txt",
    ]
    "#);
    assert!(l.dest.join("src/linked").is_dir());
}
