// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, PublishResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Removes a single file; a file that is already gone is not an error.
///
/// # Errors
///
/// Returns an `FsError` for any failure other than `NotFound`.
pub fn remove_file_if_exists(path: &Path) -> PublishResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => retry_writable(path, e),
        Err(e) => Err(FsError::from_io(path, e).into()),
    }
}

// git marks pack files read-only; Windows refuses to delete those.
#[cfg(windows)]
fn retry_writable(path: &Path, original: std::io::Error) -> PublishResult<()> {
    let Ok(meta) = fs::symlink_metadata(path) else {
        return Err(FsError::from_io(path, original).into());
    };
    let mut permissions = meta.permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(path, permissions).map_err(|e| FsError::from_io(path, e))?;
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::from_io(path, e).into()),
    }
}

#[cfg(not(windows))]
fn retry_writable(path: &Path, original: std::io::Error) -> PublishResult<()> {
    Err(FsError::from_io(path, original).into())
}

fn remove_dir_if_exists(path: &Path) -> PublishResult<()> {
    match fs::remove_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(FsError::from_io(path, e).into()),
    }
}

/// Deletes `root` and everything below it, bottom-up.
///
/// Within each directory the plain files are removed first, then every
/// subdirectory is emptied depth-first, and only then the directory itself.
/// Entries that disappear while this runs, or a `root` that does not exist,
/// are not errors, so calling this twice is harmless. Symbolic links are
/// removed, never followed.
///
/// # Errors
///
/// Returns an `FsError` if an existing entry cannot be listed or removed.
pub fn remove_tree(root: &Path) -> PublishResult<()> {
    let meta = match fs::symlink_metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(FsError::from_io(root, e).into()),
    };
    if !meta.is_dir() {
        return remove_file_if_exists(root);
    }

    // (directory, contents already handled)
    let mut stack: Vec<(PathBuf, bool)> = vec![(root.to_path_buf(), false)];
    while let Some((dir, expanded)) = stack.pop() {
        if expanded {
            trace!(dir = %dir.display(), "removing directory");
            remove_dir_if_exists(&dir)?;
            continue;
        }

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(FsError::from_io(&dir, e).into()),
        };

        stack.push((dir.clone(), true));
        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::from_io(&dir, e))?;
            let path = entry.path();
            let is_dir = entry
                .file_type()
                .map(|ft| ft.is_dir())
                .map_err(|e| FsError::from_io(&path, e))?;
            if is_dir {
                subdirs.push(path);
            } else {
                remove_file_if_exists(&path)?;
            }
        }
        stack.extend(subdirs.into_iter().map(|sub| (sub, false)));
    }

    Ok(())
}

/// Removes the now-empty ancestors of `relative` below `root`.
///
/// Walks upwards from the parent of `relative` and stops at the first
/// directory that still has content, or at `root`, which is never removed.
///
/// # Errors
///
/// Returns an `FsError` if a directory cannot be inspected or removed.
pub fn prune_empty_parents(root: &Path, relative: &Path) -> PublishResult<usize> {
    let mut removed = 0;
    let mut current = relative.parent();
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() {
            break;
        }
        let absolute = root.join(dir);
        let is_empty = match fs::read_dir(&absolute) {
            Ok(mut entries) => entries.next().is_none(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(FsError::from_io(&absolute, e).into()),
        };
        if !is_empty {
            break;
        }
        remove_dir_if_exists(&absolute)?;
        removed += 1;
        current = dir.parent();
    }
    Ok(removed)
}
