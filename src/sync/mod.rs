// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tree synchronization into a working copy.
//!
//! ```text
//! 1. project root   includes (required) - excludes  -->  <dest>/<path>
//! 2. meta root      everything          - excludes  -->  <dest>/<path>
//! 3. docs root      everything          - excludes  -->  <dest>/javadoc/<path>
//! 4. dest listing   everything          - excludes
//!                   minus union(1..3)               -->  delete, prune empty dirs
//! ```
//!
//! Order is fixed; a later root overwrites a file copied by an earlier one.

#[cfg(test)]
mod tests;

use bon::Builder;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::PublishResult;
use crate::select::{FileSelector, RelativePath, list};
use crate::utility::fs::copy::copy_preserving_mtime;
use crate::utility::fs::remove::{prune_empty_parents, remove_file_if_exists};
use crate::utility::fs::walk::{WalkOptions, list_files};

/// Destination subfolder for the documentation root.
pub const DOCS_SUBFOLDER: &str = "javadoc";

/// What a synchronization changed in the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Destination-relative paths written, from all roots.
    pub copied: BTreeSet<RelativePath>,
    /// Dangling destination files that were deleted, in deletion order.
    pub deleted: Vec<RelativePath>,
    /// Directories removed because the deletions left them empty.
    pub pruned_dirs: usize,
}

/// Mirrors the selected files of up to three source roots into a destination.
#[derive(Debug, Builder)]
pub struct TreeSynchronizer {
    /// Project root, filtered by the selector's include and exclude sets.
    #[builder(setters(name = with_project_root), into)]
    project_root: PathBuf,
    #[builder(setters(name = with_selector))]
    selector: FileSelector,
    /// Meta files, copied if the folder exists.
    #[builder(setters(name = with_meta_root), into)]
    meta_root: Option<PathBuf>,
    /// Documentation, copied below [`DOCS_SUBFOLDER`] if the folder exists.
    #[builder(setters(name = with_docs_root), into)]
    docs_root: Option<PathBuf>,
}

impl TreeSynchronizer {
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    #[must_use]
    pub const fn selector(&self) -> &FileSelector {
        &self.selector
    }

    #[must_use]
    pub fn meta_root(&self) -> Option<&Path> {
        self.meta_root.as_deref()
    }

    #[must_use]
    pub fn docs_root(&self) -> Option<&Path> {
        self.docs_root.as_deref()
    }

    /// Copy every selected source file into `destination`, then delete the
    /// destination files no source selected.
    ///
    /// # Errors
    ///
    /// Returns an `FsError` on the first I/O failure; copies already made
    /// stay in place.
    pub fn synchronize(&self, destination: &Path) -> PublishResult<SyncReport> {
        let mut report = SyncReport::default();

        if self.selector.includes().is_empty() {
            warn!(
                root = %self.project_root.display(),
                "no source patterns configured, nothing copied from the project"
            );
        } else {
            let selected = self.selector.select_from(&self.project_root)?;
            self.copy_all(&self.project_root, &selected, None, destination, &mut report)?;
        }

        if let Some(meta) = existing_dir(self.meta_root.as_deref()) {
            let selected = self.everything_not_excluded(&list(meta)?);
            self.copy_all(meta, &selected, None, destination, &mut report)?;
        }

        if let Some(docs) = existing_dir(self.docs_root.as_deref()) {
            let selected = self.everything_not_excluded(&list(docs)?);
            self.copy_all(
                docs,
                &selected,
                Some(DOCS_SUBFOLDER),
                destination,
                &mut report,
            )?;
        }

        self.delete_dangling(destination, &mut report)?;

        info!(
            copied = report.copied.len(),
            deleted = report.deleted.len(),
            pruned = report.pruned_dirs,
            "synchronized"
        );
        Ok(report)
    }

    fn everything_not_excluded(&self, paths: &[RelativePath]) -> Vec<RelativePath> {
        paths
            .iter()
            .filter(|p| !self.selector.is_excluded(p))
            .cloned()
            .collect()
    }

    fn copy_all(
        &self,
        root: &Path,
        selected: &[RelativePath],
        subfolder: Option<&str>,
        destination: &Path,
        report: &mut SyncReport,
    ) -> PublishResult<()> {
        debug!(root = %root.display(), count = selected.len(), "copying");
        for path in selected {
            let target = subfolder.map_or_else(|| path.clone(), |folder| path.under(folder));
            copy_preserving_mtime(
                &root.join(path.to_path_buf()),
                &destination.join(target.to_path_buf()),
            )?;
            report.copied.insert(target);
        }
        Ok(())
    }

    fn delete_dangling(&self, destination: &Path, report: &mut SyncReport) -> PublishResult<()> {
        let present = list_files(destination, &WalkOptions::for_working_copy())?;
        for relative in present {
            let path = RelativePath::from_path(&relative);
            if self.selector.is_excluded(&path) || report.copied.contains(&path) {
                continue;
            }
            remove_file_if_exists(&destination.join(&relative))?;
            debug!(path = %path, "Deleted dangling File");
            report.pruned_dirs += prune_empty_parents(destination, &relative)?;
            report.deleted.push(path);
        }
        Ok(())
    }
}

fn existing_dir(path: Option<&Path>) -> Option<&Path> {
    match path {
        Some(dir) if dir.is_dir() => Some(dir),
        Some(missing) => {
            debug!(path = %missing.display(), "optional root absent, skipped");
            None
        }
        None => None,
    }
}
