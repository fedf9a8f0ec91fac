// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Publish orchestration.
//!
//! ```text
//! preflight   git on PATH, patterns compile, work folder is a directory
//!     |
//!     v
//! working copy  <work>/<fixed name> | <work>/tempGit*
//!     |
//!     v
//! clone --> status (must be clean) --> synchronize --> status
//!                                                        |
//!                                   clean: no-op <-------+-------> dirty
//!                                                                    |
//!                     stage --> status (gate) --> commit --> push (dry run: local only)
//!     |
//!     v
//! cleanup     unless must_cleanup is off or dry run
//! ```
//!
//! Only this module creates or deletes a working copy.

#[cfg(test)]
mod tests;

use bon::Builder;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{ConfigError, ErrorCategory, FsError, PublishError, PublishResult};
use crate::git::backend::{PushReport, ShellBackend};
use crate::git::credentials::{AmbientCredentials, CredentialsProvider};
use crate::git::session::{CommitIdentity, RepositorySession};
use crate::git::status::{StatusCategories, StatusSnapshot};
use crate::logging::dump_lines;
use crate::select::{FileSelector, RelativePath};
use crate::sync::{SyncReport, TreeSynchronizer};
use crate::utility::fs::remove::remove_tree;
use crate::utility::fs::walk::{WalkOptions, dump_tree};

/// Work folder name below the project directory.
pub const WORK_FOLDER_DEFAULT: &str = "gitpublishwork";

/// Meta folder name below the project directory.
pub const META_FOLDER_DEFAULT: &str = "gitMeta";

/// Prefix of generated working copy names.
pub const WORKING_COPY_PREFIX: &str = "tempGit";

/// Fully resolved input of one publish run.
#[derive(Debug, Builder)]
pub struct PublishRequest {
    /// Commit message, used verbatim.
    #[builder(setters(name = with_commit_message), into)]
    commit_message: String,
    /// Clone and push target.
    #[builder(setters(name = with_remote_uri), into)]
    remote_uri: String,
    /// Credentials handle; git's own configuration when absent.
    #[builder(setters(name = with_credentials))]
    credentials: Option<Arc<dyn CredentialsProvider>>,
    #[builder(setters(name = with_project_dir), into)]
    project_dir: PathBuf,
    /// Include patterns for the project directory.
    #[builder(setters(name = with_sources), default)]
    sources: Vec<String>,
    /// Exclude patterns for every root.
    #[builder(setters(name = with_ignores), default)]
    ignores: Vec<String>,
    #[builder(setters(name = with_meta_dir), into)]
    meta_dir: Option<PathBuf>,
    #[builder(setters(name = with_docs_dir), into)]
    docs_dir: Option<PathBuf>,
    #[builder(setters(name = with_work_folder), into)]
    work_folder: Option<PathBuf>,
    /// Fixed working copy name inside the work folder.
    #[builder(setters(name = with_local_repository_folder), into)]
    local_repository_folder: Option<String>,
    /// Promote tree and status dumps to `info`.
    #[builder(setters(name = with_debug), default = false)]
    debug: bool,
    #[builder(setters(name = with_dry_run), default = false)]
    dry_run: bool,
    #[builder(setters(name = with_must_cleanup), default = true)]
    must_cleanup: bool,
    #[builder(setters(name = with_author))]
    author: Option<CommitIdentity>,
}

impl PublishRequest {
    #[must_use]
    pub fn commit_message(&self) -> &str {
        &self.commit_message
    }

    #[must_use]
    pub fn remote_uri(&self) -> &str {
        &self.remote_uri
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub const fn is_debug(&self) -> bool {
        self.debug
    }

    /// Cleanup runs unless disabled or the run is a dry run.
    #[must_use]
    pub const fn cleanup_enabled(&self) -> bool {
        self.must_cleanup && !self.dry_run
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Work folder, relative values taken from the project directory.
    #[must_use]
    pub fn resolved_work_folder(&self) -> PathBuf {
        self.resolve(
            self.work_folder
                .as_deref()
                .unwrap_or_else(|| Path::new(WORK_FOLDER_DEFAULT)),
        )
    }

    /// Meta folder, `gitMeta` below the project directory by default.
    #[must_use]
    pub fn resolved_meta_dir(&self) -> PathBuf {
        self.resolve(
            self.meta_dir
                .as_deref()
                .unwrap_or_else(|| Path::new(META_FOLDER_DEFAULT)),
        )
    }

    #[must_use]
    pub fn resolved_docs_dir(&self) -> Option<PathBuf> {
        self.docs_dir.as_deref().map(|dir| self.resolve(dir))
    }

    fn credentials_provider(&self) -> Arc<dyn CredentialsProvider> {
        self.credentials
            .clone()
            .unwrap_or_else(|| Arc::new(AmbientCredentials))
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Publication {
    /// The synchronized tree matched the remote; nothing was committed.
    NoChanges,
    /// A commit was created and pushed (or dry-run pushed).
    Published { commit: String, push: PushReport },
}

/// Result of one publish run plus its diagnostics.
#[derive(Debug)]
pub struct PublishOutcome {
    result: PublishResult<Publication>,
    snapshot: Option<StatusSnapshot>,
    sync: Option<SyncReport>,
    working_copy: Option<PathBuf>,
    retained: bool,
    cleanup_error: Option<PublishError>,
}

impl PublishOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    #[must_use]
    pub const fn result(&self) -> &PublishResult<Publication> {
        &self.result
    }

    /// The primary result; a cleanup failure after success is reported as failure.
    ///
    /// # Errors
    ///
    /// Returns the run's error, or the cleanup error of an otherwise successful run.
    pub fn into_result(self) -> PublishResult<Publication> {
        match (self.result, self.cleanup_error) {
            (Ok(_), Some(cleanup)) => Err(cleanup),
            (result, _) => result,
        }
    }

    /// Last status snapshot taken, if the run got that far.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&StatusSnapshot> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub const fn sync_report(&self) -> Option<&SyncReport> {
        self.sync.as_ref()
    }

    #[must_use]
    pub fn working_copy(&self) -> Option<&Path> {
        self.working_copy.as_deref()
    }

    /// True if the working copy was left on disk.
    #[must_use]
    pub const fn retained(&self) -> bool {
        self.retained
    }

    #[must_use]
    pub const fn cleanup_error(&self) -> Option<&PublishError> {
        self.cleanup_error.as_ref()
    }

    /// Human-readable summary lines.
    #[must_use]
    pub fn diagnostic(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.result {
            Ok(Publication::NoChanges) => lines.push("no changes to publish".to_string()),
            Ok(Publication::Published { commit, push }) => {
                let verb = if push.dry_run { "dry-run pushed" } else { "pushed" };
                lines.push(format!("{verb} commit {commit}"));
            }
            Err(err) => lines.push(format!("failed ({}): {err}", err.category())),
        }
        if let Some(sync) = &self.sync {
            lines.push(format!(
                "synchronized {} file(s), deleted {}",
                sync.copied.len(),
                sync.deleted.len()
            ));
        }
        if let Some(snapshot) = &self.snapshot {
            lines.push(format!("final status: {}", snapshot.summary()));
        }
        if let (true, Some(path)) = (self.retained, &self.working_copy) {
            lines.push(format!("working copy kept at {}", path.display()));
        }
        if let Some(err) = &self.cleanup_error {
            lines.push(format!("cleanup failed: {err}"));
        }
        lines
    }
}

#[derive(Serialize)]
struct ErrorView {
    category: ErrorCategory,
    message: String,
}

impl From<&PublishError> for ErrorView {
    fn from(err: &PublishError) -> Self {
        Self {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

impl Serialize for PublishOutcome {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PublishOutcome", 8)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("publication", &self.result.as_ref().ok())?;
        state.serialize_field(
            "error",
            &self.result.as_ref().err().map(ErrorView::from),
        )?;
        state.serialize_field("snapshot", &self.snapshot)?;
        state.serialize_field("sync", &self.sync)?;
        state.serialize_field("working_copy", &self.working_copy)?;
        state.serialize_field("retained", &self.retained)?;
        state.serialize_field(
            "cleanup_error",
            &self.cleanup_error.as_ref().map(ErrorView::from),
        )?;
        state.end()
    }
}

/// Diagnostics gathered while the session runs.
#[derive(Default)]
struct Progress {
    snapshot: Option<StatusSnapshot>,
    sync: Option<SyncReport>,
}

/// Run one publish: clone, synchronize, and commit and push if anything changed.
///
/// Never panics on failure; the error is carried in the outcome together
/// with whatever diagnostics were collected.
#[must_use]
pub fn publish(request: &PublishRequest) -> PublishOutcome {
    if request.debug {
        dump_lines(
            true,
            &format!(
                "contents of the project folder {}",
                request.project_dir.display()
            ),
            &dump_tree(&request.project_dir, &WalkOptions::default()),
        );
    }

    let (synchronizer, working_copy) = match preflight(request) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!(error = %err, "publish aborted before clone");
            return PublishOutcome {
                result: Err(err),
                snapshot: None,
                sync: None,
                working_copy: None,
                retained: false,
                cleanup_error: None,
            };
        }
    };

    let mut progress = Progress::default();
    let result = run_session(request, &synchronizer, &working_copy, &mut progress);
    if let Err(err) = &result {
        error!(error = %err, category = %err.category(), "publish failed");
    }

    let (retained, cleanup_error) = if request.cleanup_enabled() {
        match remove_tree(&working_copy) {
            Ok(()) => {
                debug!(working_copy = %working_copy.display(), "working copy removed");
                (false, None)
            }
            Err(err) => {
                warn!(error = %err, "failed to remove working copy");
                (working_copy.exists(), Some(err))
            }
        }
    } else {
        info!(working_copy = %working_copy.display(), "working copy kept");
        (true, None)
    };

    PublishOutcome {
        result,
        snapshot: progress.snapshot,
        sync: progress.sync,
        working_copy: Some(working_copy),
        retained,
        cleanup_error,
    }
}

/// Checks that need no remote, then the working copy folder.
fn preflight(request: &PublishRequest) -> PublishResult<(TreeSynchronizer, PathBuf)> {
    ShellBackend::git_executable()?;

    let work = request.resolved_work_folder();
    let mut ignores = request.ignores.clone();
    ignores.extend(nested_folder_exclude(&request.project_dir, &work));

    let selector = FileSelector::from_patterns(&request.sources, &ignores)?;
    let synchronizer = TreeSynchronizer::builder()
        .with_project_root(request.project_dir.clone())
        .with_selector(selector)
        .with_meta_root(request.resolved_meta_dir())
        .maybe_with_docs_root(request.resolved_docs_dir())
        .build();

    debug!(work_folder = %work.display(), "work folder");
    ensure_dir(&work)?;

    let working_copy = match &request.local_repository_folder {
        Some(name) => {
            let fixed = work.join(name);
            ensure_dir(&fixed)?;
            fixed
        }
        None => tempfile::Builder::new()
            .prefix(WORKING_COPY_PREFIX)
            .tempdir_in(&work)
            .map_err(|e| FsError::from_io(&work, e))?
            .keep(),
    };
    info!(working_copy = %working_copy.display(), "working copy prepared");
    Ok((synchronizer, working_copy))
}

/// Literal exclude for a work folder that lives inside the project directory.
fn nested_folder_exclude(project: &Path, work: &Path) -> Option<String> {
    let relative = work.strip_prefix(project).ok()?;
    let relative = RelativePath::from_path(relative);
    if relative.as_str().is_empty() {
        return None;
    }
    Some(format!("regex:{}/.*", regex::escape(relative.as_str())))
}

/// Create `path` if absent; an existing non-directory is a configuration error.
fn ensure_dir(path: &Path) -> PublishResult<()> {
    if path.exists() && !path.is_dir() {
        return Err(ConfigError::NotADirectory(path.display().to_string()).into());
    }
    fs::create_dir_all(path).map_err(|e| FsError::from_io(path, e))?;
    Ok(())
}

fn run_session(
    request: &PublishRequest,
    synchronizer: &TreeSynchronizer,
    working_copy: &Path,
    progress: &mut Progress,
) -> PublishResult<Publication> {
    let verbose = request.debug;
    let mut session = RepositorySession::clone_remote(
        &request.remote_uri,
        working_copy,
        request.credentials_provider(),
        request.author.clone(),
    )?;

    progress.snapshot = Some(session.verify_clean_clone()?);

    let report = synchronizer.synchronize(working_copy)?;
    progress.sync = Some(report);
    dump_lines(
        verbose,
        &format!("contents of the working copy {}", working_copy.display()),
        &dump_tree(working_copy, &WalkOptions::for_working_copy()),
    );

    let before_stage = session.status()?;
    progress.snapshot = Some(before_stage.clone());
    if before_stage.is_clean() {
        info!("working copy unchanged, nothing to publish");
        return Ok(Publication::NoChanges);
    }
    dump_lines(verbose, "status before add/rm", &before_stage.render_lines());

    session.stage_changes(&before_stage)?;

    let before_commit = session.status()?;
    progress.snapshot = Some(before_commit.clone());
    dump_lines(verbose, "status before commit", &before_commit.render_lines());
    if !before_commit.has_staged() {
        let residual = before_commit.paths(StatusCategories::all());
        warn!(
            residual = residual.len(),
            summary = %before_commit.summary(),
            "nothing staged after add/rm, skipping commit"
        );
        return Ok(Publication::NoChanges);
    }

    let commit = session.commit(&request.commit_message)?;
    let after_commit = session.status()?;
    dump_lines(verbose, "status after commit", &after_commit.render_lines());
    progress.snapshot = Some(after_commit);

    let push = session.push(request.dry_run)?;
    let after_push = session.status()?;
    dump_lines(verbose, "status after push", &after_push.render_lines());
    progress.snapshot = Some(after_push);

    Ok(Publication::Published { commit, push })
}
