// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, PublishResult};
use filetime::FileTime;
use std::fs;
use std::path::Path;

/// Copies one file, replacing any existing destination, and carries over the
/// source's last-modified time.
///
/// Missing parent directories of `dst` are created.
///
/// # Example
/// ```no_run
/// use git_publish::utility::fs::copy::copy_preserving_mtime;
/// use std::path::Path;
///
/// copy_preserving_mtime(Path::new("/project/src/a.txt"), Path::new("/clone/src/a.txt"))?;
/// # Ok::<(), git_publish::error::PublishError>(())
/// ```
///
/// # Errors
///
/// Returns an `FsError` if any IO operation fails (creating the parent,
/// copying, reading or writing the timestamp).
pub fn copy_preserving_mtime(src: &Path, dst: &Path) -> PublishResult<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| FsError::from_io(parent, e))?;
    }

    // fs::copy cannot open a read-only destination for writing
    if fs::symlink_metadata(dst).is_ok_and(|meta| meta.permissions().readonly()) {
        fs::remove_file(dst).map_err(|e| FsError::from_io(dst, e))?;
    }

    fs::copy(src, dst).map_err(|e| FsError::from_io(src, e))?;

    let modified = fs::metadata(src)
        .map(|meta| FileTime::from_last_modification_time(&meta))
        .map_err(|e| FsError::from_io(src, e))?;
    filetime::set_file_mtime(dst, modified).map_err(|e| FsError::from_io(dst, e))?;

    Ok(())
}
