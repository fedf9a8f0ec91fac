// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working copy status snapshots.
//!
//! ```text
//! git status --porcelain=v1 -z        XY path\0 ...
//!   X (index)   A added   M/T changed   D removed
//!   Y (tree)    D missing M/T modified
//!   ??  untracked     !!  ignored (not in index)
//!   DD AU UD UA DU AA UU  conflicting
//!   uncommitted = added | changed | removed | missing | modified | conflicting
//! ```

use bitflags::bitflags;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::select::RelativePath;

bitflags! {
    /// Status categories; combined values name groups used by staging.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusCategories: u16 {
        const ADDED = 0x001;
        const CHANGED = 0x002;
        const CONFLICTING = 0x004;
        const IGNORED = 0x008;
        const MISSING = 0x010;
        const MODIFIED = 0x020;
        const REMOVED = 0x040;
        const UNCOMMITTED = 0x080;
        const UNTRACKED = 0x100;
        const UNTRACKED_FOLDERS = 0x200;

        /// Changes recorded in the index, i.e. what a commit would contain.
        const STAGED = Self::ADDED.bits() | Self::CHANGED.bits() | Self::REMOVED.bits();
        /// Paths that `git add` must pick up.
        const TO_ADD = Self::UNTRACKED.bits() | Self::MODIFIED.bits();
        /// Paths that `git rm` must pick up.
        const TO_REMOVE = Self::MISSING.bits();
    }
}

/// Ten path sets describing a working copy at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub added: BTreeSet<RelativePath>,
    pub changed: BTreeSet<RelativePath>,
    pub conflicting: BTreeSet<RelativePath>,
    pub ignored_not_in_index: BTreeSet<RelativePath>,
    pub missing: BTreeSet<RelativePath>,
    pub modified: BTreeSet<RelativePath>,
    pub removed: BTreeSet<RelativePath>,
    pub uncommitted: BTreeSet<RelativePath>,
    pub untracked: BTreeSet<RelativePath>,
    pub untracked_folders: BTreeSet<RelativePath>,
}

const UNMERGED: &[&str] = &["DD", "AU", "UD", "UA", "DU", "AA", "UU"];

impl StatusSnapshot {
    /// Build a snapshot from two NUL-separated porcelain v1 listings.
    ///
    /// `entries` comes from `--untracked-files=all --ignored`, `folders` from
    /// `--untracked-files=normal`; only the `??` directory records of the
    /// latter are used.
    ///
    /// # Errors
    ///
    /// Returns a description of the first malformed record.
    pub fn from_porcelain(entries: &str, folders: &str) -> Result<Self, String> {
        let mut snapshot = Self::default();

        for (code, path) in records(entries)? {
            let entry = RelativePath::from(path);
            if code == "??" {
                snapshot.untracked.insert(entry);
                continue;
            }
            if code == "!!" {
                snapshot.ignored_not_in_index.insert(entry);
                continue;
            }
            if UNMERGED.contains(&code) {
                snapshot.conflicting.insert(entry.clone());
                snapshot.uncommitted.insert(entry);
                continue;
            }

            let mut chars = code.chars();
            let index = chars.next().unwrap_or(' ');
            let tree = chars.next().unwrap_or(' ');
            match index {
                'A' => snapshot.added.insert(entry.clone()),
                'M' | 'T' => snapshot.changed.insert(entry.clone()),
                'D' => snapshot.removed.insert(entry.clone()),
                _ => false,
            };
            match tree {
                'D' => snapshot.missing.insert(entry.clone()),
                'M' | 'T' => snapshot.modified.insert(entry.clone()),
                _ => false,
            };
            snapshot.uncommitted.insert(entry);
        }

        for (code, path) in records(folders)? {
            if code == "??" && path.ends_with('/') {
                snapshot.untracked_folders.insert(RelativePath::from(path));
            }
        }

        Ok(snapshot)
    }

    /// Fixed-order view of every category.
    fn sections(&self) -> [(StatusCategories, char, &'static str, &BTreeSet<RelativePath>); 10] {
        [
            (StatusCategories::ADDED, 'A', "added", &self.added),
            (StatusCategories::CHANGED, 'C', "changed", &self.changed),
            (StatusCategories::CONFLICTING, 'X', "conflicting", &self.conflicting),
            (StatusCategories::IGNORED, 'i', "ignored", &self.ignored_not_in_index),
            (StatusCategories::MISSING, '#', "missing", &self.missing),
            (StatusCategories::MODIFIED, 'M', "modified", &self.modified),
            (StatusCategories::REMOVED, 'R', "removed", &self.removed),
            (StatusCategories::UNCOMMITTED, 'U', "uncommitted", &self.uncommitted),
            (StatusCategories::UNTRACKED, 'u', "untracked", &self.untracked),
            (
                StatusCategories::UNTRACKED_FOLDERS,
                'f',
                "untracked folders",
                &self.untracked_folders,
            ),
        ]
    }

    /// Categories that hold at least one path.
    #[must_use]
    pub fn categories(&self) -> StatusCategories {
        self.sections()
            .into_iter()
            .filter(|(_, _, _, paths)| !paths.is_empty())
            .fold(StatusCategories::empty(), |acc, (flag, ..)| acc | flag)
    }

    /// True iff every category is empty.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.categories().is_empty()
    }

    /// True if a commit would record something.
    #[must_use]
    pub fn has_staged(&self) -> bool {
        self.categories().intersects(StatusCategories::STAGED)
    }

    /// Union of the paths in the given categories.
    #[must_use]
    pub fn paths(&self, categories: StatusCategories) -> BTreeSet<RelativePath> {
        self.sections()
            .into_iter()
            .filter(|(flag, ..)| categories.contains(*flag))
            .flat_map(|(_, _, _, paths)| paths.iter().cloned())
            .collect()
    }

    /// One `<code> <path>` line per entry, categories in fixed order.
    #[must_use]
    pub fn render_lines(&self) -> Vec<String> {
        self.sections()
            .into_iter()
            .flat_map(|(_, code, _, paths)| paths.iter().map(move |p| format!("{code} {p}")))
            .collect()
    }

    /// Counts of the non-empty categories, e.g. `2 added, 1 missing`.
    #[must_use]
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .sections()
            .into_iter()
            .filter(|(_, _, _, paths)| !paths.is_empty())
            .map(|(_, _, name, paths)| format!("{} {name}", paths.len()))
            .collect();
        if parts.is_empty() {
            "clean".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Split a `-z` listing into `(XY, path)` pairs.
fn records(raw: &str) -> Result<Vec<(&str, &str)>, String> {
    raw.split('\0')
        .filter(|record| !record.is_empty())
        .map(|record| {
            match (record.get(..2), record.get(2..3), record.get(3..)) {
                (Some(code), Some(" "), Some(path)) if !path.is_empty() => Ok((code, path)),
                _ => Err(format!("malformed status record '{record}'")),
            }
        })
        .collect()
}
