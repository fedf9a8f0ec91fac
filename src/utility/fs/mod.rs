// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities for deterministic traversal, copy and removal.
//!
//! ```text
//! walk:    list_files()            ignore::Walk, files of a folder after its subfolders
//!          dump_tree()             "D path" / "F path" lines for debug output
//!          WalkOptions             hidden, gitignore, follow_links, skip_dirs
//! copy:    copy_preserving_mtime() overwrite + carry last-modified time
//! remove:  remove_tree()           bottom-up, tolerant of vanished entries
//! ```
//!
//! Everything here is sequential; ordering is part of the contract.

pub mod copy;
pub mod remove;
pub mod walk;
