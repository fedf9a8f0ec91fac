// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for git-publish using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! git-publish [global options] <command>
//! publish [--dry-run] [--keep] [--source PATTERN]... [--json]
//! options
//! configs
//! version
//! ```

pub mod global;
pub mod publish;


use crate::cli::global::GlobalOptions;
use crate::cli::publish::PublishArgs;
use clap::{Parser, Subcommand};

/// Mirror selected project files into a remote git repository.
#[derive(Debug, Parser)]
#[command(
    name = "git-publish",
    author,
    version,
    about = "Mirror project files into a remote git repository",
    long_about = "git-publish Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Clones the remote, copies the selected files into the clone,\n\
                  and commits and pushes only when something changed.",
    after_help = "CONFIG FILES:\n\n\
                  git-publish reads `git-publish.toml` from the current directory\n\
                  if it exists, then every file given with --config in order.\n\
                  GITPUBLISH_<SECTION>__<KEY> environment variables override the\n\
                  files, --set overrides the environment, and explicit flags such\n\
                  as --dry-run override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the configuration files that were loaded.
    Configs,

    /// Publishes the selected files to the remote.
    Publish(PublishArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
