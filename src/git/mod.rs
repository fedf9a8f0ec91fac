// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!              RepositorySession (session.rs)
//!        clone / status / stage / commit / push
//!                        |
//!            ,-----------+-----------,
//!            | backend (traits)      |
//!            '--+----------+---------'
//!               |          |
//!               v          v
//!          GitQuery    GitInspect + GitMutation
//!         (gix, read)  (CLI, status + write)
//!               |          |
//!               v          v
//!          GixBackend  ShellBackend
//!          .branch     .status  .clone  .add/.rm
//!          .head       .commit  .push
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for transports, credential helpers, writes.

pub mod backend;
pub mod credentials;
pub mod session;
pub mod status;

#[cfg(test)]
mod tests;

pub use backend::{PushReport, PushedRef};
pub use credentials::{
    AmbientCredentials, CredentialsProvider, StaticCredentials, UsernamePassword,
};
pub use session::{CommitIdentity, RepositorySession, SessionState};
pub use status::{StatusCategories, StatusSnapshot};
