// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for git-publish.
//!
//! # Config Structure
//!
//! ```text
//! Config
//!   [global]   output_log_level, file_log_level, log_file
//!   [publish]  commit_message, remote_uri, username, password,
//!              project_dir, sources, ignores, meta_dir, docs_dir,
//!              work_folder, local_repository_folder,
//!              debug, dry_run, must_cleanup, author_name, author_email
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for stderr output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// Publish options.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Message for the publish commit.
    pub commit_message: Option<String>,
    /// Remote repository to clone and push.
    pub remote_uri: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Project directory; the current directory when unset.
    pub project_dir: Option<PathBuf>,
    /// Include patterns, relative to the project directory.
    pub sources: Vec<String>,
    /// Exclude patterns for all roots.
    pub ignores: Vec<String>,
    /// Meta folder (default `<project>/gitMeta`).
    pub meta_dir: Option<PathBuf>,
    /// Documentation folder, copied below `javadoc/`.
    pub docs_dir: Option<PathBuf>,
    /// Parent of working copies (default `<project>/gitpublishwork`).
    pub work_folder: Option<PathBuf>,
    /// Fixed working copy name; generated when unset.
    pub local_repository_folder: Option<String>,
    pub debug: bool,
    pub dry_run: bool,
    /// Remove the working copy after a normal run.
    pub must_cleanup: bool,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            commit_message: None,
            remote_uri: None,
            username: None,
            password: None,
            project_dir: None,
            sources: Vec::new(),
            ignores: Vec::new(),
            meta_dir: None,
            docs_dir: None,
            work_folder: None,
            local_repository_folder: None,
            debug: false,
            dry_run: false,
            must_cleanup: true,
            author_name: None,
            author_email: None,
        }
    }
}

impl std::fmt::Debug for PublishConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishConfig")
            .field("commit_message", &self.commit_message)
            .field("remote_uri", &self.remote_uri)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[hidden]"))
            .field("project_dir", &self.project_dir)
            .field("sources", &self.sources)
            .field("ignores", &self.ignores)
            .field("meta_dir", &self.meta_dir)
            .field("docs_dir", &self.docs_dir)
            .field("work_folder", &self.work_folder)
            .field("local_repository_folder", &self.local_repository_folder)
            .field("debug", &self.debug)
            .field("dry_run", &self.dry_run)
            .field("must_cleanup", &self.must_cleanup)
            .field("author_name", &self.author_name)
            .field("author_email", &self.author_email)
            .finish()
    }
}
