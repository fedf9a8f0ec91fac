// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   walk:    list_files() subfolders-first, dump_tree()
//!   copy:    copy_preserving_mtime()
//!   remove:  remove_tree(), remove_file_if_exists(), prune_empty_parents()
//! ```

pub mod fs;
