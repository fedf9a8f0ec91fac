// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{FsError, PublishResult};
use bon::Builder;
use ignore::WalkBuilder;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options for directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = true)]
    include_hidden: bool,
    /// Respect .gitignore files
    #[builder(setters(name = with_respect_gitignore), default = false)]
    respect_gitignore: bool,
    /// Skip directories matching these names (exact match)
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    /// Returns whether to follow symbolic links.
    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    /// Returns whether to include hidden files/directories.
    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Returns whether to respect .gitignore files.
    #[must_use]
    pub const fn respect_gitignore(&self) -> bool {
        self.respect_gitignore
    }

    /// Returns the skip directories list.
    #[must_use]
    pub fn skip_dirs(&self) -> &[String] {
        &self.skip_dirs
    }

    /// Options for listing a source root: symbolic links to folders are
    /// entered like folders.
    #[must_use]
    pub fn for_source_root() -> Self {
        Self::builder().with_follow_links(true).build()
    }

    /// Options for dumping a working copy: everything except git metadata.
    #[must_use]
    pub fn for_working_copy() -> Self {
        Self::builder()
            .with_skip_dirs(vec![".git".to_string()])
            .build()
    }
}

/// Builds a sequential `WalkBuilder` with stable, name-sorted entry order.
fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    builder.ignore(false);
    builder.parents(false);
    builder.require_git(false);
    builder.git_ignore(options.respect_gitignore());
    builder.git_global(options.respect_gitignore());
    builder.git_exclude(options.respect_gitignore());

    builder.sort_by_file_name(|a, b| a.cmp(b));

    // filter_entry is evaluated before descending
    if !options.skip_dirs().is_empty() {
        let skip_dirs: Arc<Vec<String>> = Arc::new(options.skip_dirs().to_vec());
        builder.filter_entry(move |entry| {
            if entry.depth() > 0
                && entry.file_type().is_some_and(|ft| ft.is_dir())
                && let Some(name) = entry.file_name().to_str()
                && skip_dirs.iter().any(|skip| skip == name)
            {
                return false;
            }
            true
        });
    }

    builder
}

fn walk_error(root: &Path, err: &ignore::Error) -> FsError {
    let kind = err
        .io_error()
        .map_or(std::io::ErrorKind::Other, std::io::Error::kind);
    FsError::from_io(root, std::io::Error::new(kind, err.to_string()))
}

/// Sort key placing every subfolder of a folder before that folder's files.
///
/// Directory components are tagged `false`, the final file name `true`, so a
/// file always compares greater than anything nested in a sibling folder.
fn subfolders_first_key(relative: &Path) -> Vec<(bool, OsString)> {
    let mut key: Vec<(bool, OsString)> = relative
        .components()
        .map(|c| (false, c.as_os_str().to_os_string()))
        .collect();
    if let Some(last) = key.last_mut() {
        last.0 = true;
    }
    key
}

/// Lists all files below `root` as paths relative to `root`.
///
/// Order: for every folder, the contents of all of its subfolders (recursively)
/// come first, then the folder's own files. Names are sorted within a level,
/// so the listing is identical across runs on an unchanged tree. Directories
/// themselves are not listed.
///
/// # Errors
///
/// Returns an `FsError` if `root` does not exist or any entry cannot be read.
/// A single unreadable entry aborts the whole listing.
///
/// # Example
/// ```no_run
/// use git_publish::utility::fs::walk::{list_files, WalkOptions};
///
/// let files = list_files("/path/to/project".as_ref(), &WalkOptions::default())?;
/// for file in files {
///     println!("{}", file.display());
/// }
/// # Ok::<(), git_publish::error::PublishError>(())
/// ```
pub fn list_files(root: &Path, options: &WalkOptions) -> PublishResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(FsError::NotFound(root.display().to_string()).into());
    }

    let mut files = Vec::new();
    for entry in build_walker(root, options).build() {
        let entry = entry.map_err(|e| walk_error(root, &e))?;
        if entry.file_type().is_some_and(|ft| ft.is_dir()) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }

    files.sort_by_cached_key(|p| subfolders_first_key(p));
    Ok(files)
}

/// Renders the tree below `root` as `D path` / `F path` lines.
///
/// Used only for diagnostic dumps; unreadable entries are skipped.
#[must_use]
pub fn dump_tree(root: &Path, options: &WalkOptions) -> Vec<String> {
    build_walker(root, options)
        .build()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.depth() > 0)
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(root).ok()?;
            let marker = if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                'D'
            } else {
                'F'
            };
            Some(format!(
                "{marker} {}",
                relative.to_string_lossy().replace('\\', "/")
            ))
        })
        .collect()
}
