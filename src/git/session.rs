// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository session over one working copy.
//!
//! ```text
//! clone_remote --> Cloned --status--> Clean | Dirty
//!                                            |
//!                              stage_changes v
//!                                         Staged --commit--> Committed --push--> Pushed
//! ```
//!
//! The session never deletes its working copy.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::backend::{
    GitInspect, GitMutation, GitQuery, GixBackend, ORIGIN, PushReport, ShellBackend,
};
use super::credentials::CredentialsProvider;
use super::status::{StatusCategories, StatusSnapshot};
use crate::error::{GitError, PublishResult};
use crate::logging::dump_lines;

/// Author and committer identity for the publish commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl CommitIdentity {
    /// `-c` values that apply this identity to a single git invocation.
    #[must_use]
    pub fn config_overrides(&self) -> Vec<String> {
        vec![
            format!("user.name={}", self.name),
            format!("user.email={}", self.email),
        ]
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Cloned,
    Clean,
    Dirty,
    Staged,
    Committed,
    Pushed,
}

/// Clone, status, stage, commit and push against one working copy.
#[derive(Debug)]
pub struct RepositorySession {
    workdir: PathBuf,
    remote: String,
    credentials: Arc<dyn CredentialsProvider>,
    identity: Option<CommitIdentity>,
    state: SessionState,
}

impl RepositorySession {
    /// Clone `remote` into `workdir`, which must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `GitError::AuthenticationFailed` or `GitError::CloneFailed`.
    #[instrument(skip_all, fields(remote = %remote, workdir = %workdir.display()))]
    pub fn clone_remote(
        remote: &str,
        workdir: &Path,
        credentials: Arc<dyn CredentialsProvider>,
        identity: Option<CommitIdentity>,
    ) -> PublishResult<Self> {
        info!("cloning");
        let auth = credentials.credentials();
        ShellBackend::clone(remote, workdir, auth.as_ref())?;
        Ok(Self {
            workdir: workdir.to_path_buf(),
            remote: remote.to_string(),
            credentials,
            identity,
            state: SessionState::Cloned,
        })
    }

    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    #[must_use]
    pub fn remote(&self) -> &str {
        &self.remote
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Branch checked out by the clone, if any.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the working copy cannot be opened.
    pub fn branch(&self) -> PublishResult<Option<String>> {
        GixBackend::current_branch(&self.workdir)
    }

    /// Query the working copy status.
    ///
    /// Before staging, the result moves the session to `Clean` or `Dirty`;
    /// later queries are checkpoints and leave the state alone.
    ///
    /// # Errors
    ///
    /// Returns `GitError::StatusFailed` if the working copy is corrupt.
    pub fn status(&mut self) -> PublishResult<StatusSnapshot> {
        let snapshot = ShellBackend::status(&self.workdir)?;
        if matches!(
            self.state,
            SessionState::Cloned | SessionState::Clean | SessionState::Dirty
        ) {
            self.state = if snapshot.is_clean() {
                SessionState::Clean
            } else {
                SessionState::Dirty
            };
        }
        debug!(state = ?self.state, summary = %snapshot.summary(), "status");
        Ok(snapshot)
    }

    /// Status right after clone; anything but clean is a protocol violation.
    ///
    /// # Errors
    ///
    /// Returns `GitError::DirtyClone` if the fresh clone has local changes.
    pub fn verify_clean_clone(&mut self) -> PublishResult<StatusSnapshot> {
        let snapshot = self.status()?;
        if snapshot.is_clean() {
            Ok(snapshot)
        } else {
            dump_lines(true, "status after clone", &snapshot.render_lines());
            Err(GitError::DirtyClone {
                path: self.workdir.display().to_string(),
                summary: snapshot.summary(),
            }
            .into())
        }
    }

    /// Stage `untracked ∪ modified` with one add and `missing` with one rm.
    ///
    /// Empty groups are skipped.
    ///
    /// # Errors
    ///
    /// Returns `GitError::StageFailed` if git rejects either operation.
    pub fn stage_changes(&mut self, snapshot: &StatusSnapshot) -> PublishResult<()> {
        let to_add = snapshot.paths(StatusCategories::TO_ADD);
        if !to_add.is_empty() {
            debug!(count = to_add.len(), "adding paths");
            ShellBackend::add_paths(&self.workdir, &to_add)?;
        }

        let to_remove = snapshot.paths(StatusCategories::TO_REMOVE);
        if !to_remove.is_empty() {
            debug!(count = to_remove.len(), "removing paths");
            ShellBackend::remove_paths(&self.workdir, &to_remove)?;
        }

        self.state = SessionState::Staged;
        Ok(())
    }

    /// Commit the index and return the new commit id.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NothingToCommit` if the index holds no change.
    pub fn commit(&mut self, message: &str) -> PublishResult<String> {
        let snapshot = ShellBackend::status(&self.workdir)?;
        if !snapshot.has_staged() {
            return Err(GitError::NothingToCommit {
                path: self.workdir.display().to_string(),
            }
            .into());
        }

        ShellBackend::commit(&self.workdir, message, self.identity.as_ref())?;
        let id = GixBackend::head_commit(&self.workdir)?.ok_or_else(|| GitError::CommandFailed {
            command: "git commit".to_string(),
            message: "HEAD is unborn after commit".to_string(),
        })?;
        info!(commit = %id, "committed");
        self.state = SessionState::Committed;
        Ok(id)
    }

    /// Push HEAD to the cloned remote; `dry_run` transmits nothing.
    ///
    /// A failed push leaves the local commit in place.
    ///
    /// # Errors
    ///
    /// Returns `GitError::AuthenticationFailed` or `GitError::PushFailed`.
    pub fn push(&mut self, dry_run: bool) -> PublishResult<PushReport> {
        let auth = self.credentials.credentials();
        let report = ShellBackend::push(&self.workdir, ORIGIN, auth.as_ref(), dry_run)?;
        info!(dry_run, refs = report.refs.len(), "pushed");
        self.state = SessionState::Pushed;
        Ok(report)
    }
}
