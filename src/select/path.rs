// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Relative paths with a platform-independent string form.

use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path relative to some base folder, always `/`-separated.
///
/// Two relative paths are equal iff their string forms are equal; this is
/// also the form patterns are matched against and the form git reports.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Build from a relative filesystem path, joining normal components with `/`.
    ///
    /// `.` components are dropped; anything else (root, prefix, `..`) is kept
    /// by its lossy string form, so callers must only pass paths they
    /// obtained by stripping a base folder.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let parts: Vec<String> = path
            .components()
            .filter(|c| !matches!(c, Component::CurDir))
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Self(parts.join("/"))
    }

    /// The `/`-separated string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to a native path for joining onto a base folder.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }

    /// Prefix this path with a folder, e.g. the documentation subfolder.
    #[must_use]
    pub fn under(&self, folder: &str) -> Self {
        Self(format!("{}/{}", folder.trim_end_matches('/'), self.0))
    }
}

impl From<&str> for RelativePath {
    fn from(value: &str) -> Self {
        Self::from_path(Path::new(value))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
