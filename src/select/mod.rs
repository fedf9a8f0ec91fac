// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! File selection by include/exclude patterns.
//!
//! ```text
//! list(root)  -->  [RelativePath]  (subfolders before files)
//!                        |
//!                        v
//!   FileSelector { includes, excludes + ".git/**" }
//!                        |
//!   included = (includes empty || any include)
//!              && no exclude
//!                        v
//!              BTreeSet<RelativePath>
//! ```

pub mod path;
pub mod pattern;


use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{ConfigError, PublishResult};
use crate::utility::fs::walk::{WalkOptions, list_files};

pub use path::RelativePath;
pub use pattern::{Matcher, MatcherSet, PatternSyntax};

/// Patterns that are excluded from every selection and cannot be re-included.
pub const ALWAYS_IGNORED: &[&str] = &[".git/**"];

/// List every file below `root` as a relative path.
///
/// The files of a folder come after the complete contents of all of its
/// subfolders; see [`list_files`]. Symbolic links to folders are followed.
///
/// # Errors
///
/// Returns an `FsError` if the tree cannot be read.
pub fn list(root: &Path) -> PublishResult<Vec<RelativePath>> {
    Ok(list_files(root, &WalkOptions::for_source_root())?
        .iter()
        .map(|p| RelativePath::from_path(p))
        .collect())
}

/// Applies the include/exclude decision to relative paths.
#[derive(Debug)]
pub struct FileSelector {
    includes: MatcherSet,
    excludes: MatcherSet,
}

impl FileSelector {
    /// Create a selector; the always-ignored patterns are appended to `excludes`.
    #[must_use]
    pub fn new(includes: MatcherSet, excludes: MatcherSet) -> Self {
        Self {
            includes,
            excludes: excludes.chain(Self::always_ignored()),
        }
    }

    /// Selector with an empty include set: everything not excluded.
    #[must_use]
    pub fn everything(excludes: MatcherSet) -> Self {
        Self::new(MatcherSet::default(), excludes)
    }

    /// Compile raw include and ignore lists into a selector.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first malformed pattern.
    pub fn from_patterns<S: AsRef<str>>(
        includes: &[S],
        ignores: &[S],
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(
            MatcherSet::parse(includes)?,
            MatcherSet::parse(ignores)?,
        ))
    }

    fn always_ignored() -> MatcherSet {
        // The built-in patterns are known to be well-formed.
        MatcherSet::parse(ALWAYS_IGNORED).unwrap_or_default()
    }

    #[must_use]
    pub const fn includes(&self) -> &MatcherSet {
        &self.includes
    }

    #[must_use]
    pub const fn excludes(&self) -> &MatcherSet {
        &self.excludes
    }

    /// The selection decision for a single path.
    #[must_use]
    pub fn is_included(&self, path: &RelativePath) -> bool {
        (self.includes.is_empty() || self.includes.matches_any(path)) && !self.is_excluded(path)
    }

    /// True if an exclude (including the always-ignored set) matches.
    #[must_use]
    pub fn is_excluded(&self, path: &RelativePath) -> bool {
        self.excludes.matches_any(path)
    }

    /// Keep the selected paths, preserving their order.
    #[must_use]
    pub fn filter(&self, paths: &[RelativePath]) -> Vec<RelativePath> {
        paths
            .iter()
            .filter(|p| self.is_included(p))
            .cloned()
            .collect()
    }

    /// Selected paths as a set.
    #[must_use]
    pub fn select<'a, I>(&self, paths: I) -> BTreeSet<RelativePath>
    where
        I: IntoIterator<Item = &'a RelativePath>,
    {
        paths
            .into_iter()
            .filter(|p| self.is_included(p))
            .cloned()
            .collect()
    }

    /// List `root` and keep the selected files, in listing order.
    ///
    /// # Errors
    ///
    /// Returns an `FsError` if the tree cannot be read.
    pub fn select_from(&self, root: &Path) -> PublishResult<Vec<RelativePath>> {
        Ok(self.filter(&list(root)?))
    }
}
