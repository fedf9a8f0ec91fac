// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish command arguments.
//!
//! # Flag Effects
//!
//! ```text
//! --dry-run  commit locally, push with --dry-run, keep the working copy
//! --keep     keep the working copy after a normal run
//! --source / --ignore replace the configured pattern lists
//! ```

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `publish` command.
#[derive(Debug, Clone, Default, Args)]
pub struct PublishArgs {
    /// Commit message.
    #[arg(short = 'm', long = "message", value_name = "TEXT")]
    pub message: Option<String>,

    /// Remote repository to clone and push.
    #[arg(short = 'r', long = "remote", value_name = "URI")]
    pub remote: Option<String>,

    /// Project directory (defaults to the current directory).
    #[arg(short = 'p', long = "project-dir", value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Include pattern, e.g. 'src/**' or 'regex:.*\.md'. Can repeat.
    #[arg(long = "source", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub sources: Vec<String>,

    /// Exclude pattern. Can repeat.
    #[arg(long = "ignore", value_name = "PATTERN", action = clap::ArgAction::Append)]
    pub ignores: Vec<String>,

    /// Folder whose files are always published.
    #[arg(long = "meta-dir", value_name = "DIR")]
    pub meta_dir: Option<PathBuf>,

    /// Documentation folder, published below `javadoc/`.
    #[arg(long = "docs-dir", value_name = "DIR")]
    pub docs_dir: Option<PathBuf>,

    /// Parent folder of working copies.
    #[arg(long = "work-folder", value_name = "DIR")]
    pub work_folder: Option<PathBuf>,

    /// Fixed working copy name inside the work folder.
    #[arg(long = "local-folder", value_name = "NAME")]
    pub local_folder: Option<String>,

    /// Commit locally but only simulate the push.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Dump trees and status at info level.
    #[arg(long)]
    pub debug: bool,

    /// Keep the working copy after the run.
    #[arg(short = 'k', long)]
    pub keep: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PublishArgs {
    /// Converts the flags that were given to `publish.*` overrides.
    #[must_use]
    pub fn to_config_overrides(&self) -> Vec<(&'static str, config::Value)> {
        let mut overrides: Vec<(&'static str, config::Value)> = Vec::new();
        let mut text = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                overrides.push((key, value.into()));
            }
        };

        text("publish.commit_message", self.message.clone());
        text("publish.remote_uri", self.remote.clone());
        text("publish.project_dir", path(self.project_dir.as_ref()));
        text("publish.meta_dir", path(self.meta_dir.as_ref()));
        text("publish.docs_dir", path(self.docs_dir.as_ref()));
        text("publish.work_folder", path(self.work_folder.as_ref()));
        text("publish.local_repository_folder", self.local_folder.clone());

        if !self.sources.is_empty() {
            overrides.push(("publish.sources", self.sources.clone().into()));
        }
        if !self.ignores.is_empty() {
            overrides.push(("publish.ignores", self.ignores.clone().into()));
        }
        if self.dry_run {
            overrides.push(("publish.dry_run", true.into()));
        }
        if self.debug {
            overrides.push(("publish.debug", true.into()));
        }
        if self.keep {
            overrides.push(("publish.must_cleanup", false.into()));
        }
        overrides
    }
}

fn path(value: Option<&PathBuf>) -> Option<String> {
    value.map(|p| p.display().to_string())
}
