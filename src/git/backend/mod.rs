// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix), ShellBackend
//! GitInspect (status) --> ShellBackend (porcelain v1)
//! GitMutation (write) --> ShellBackend (git CLI)
//! ```

use std::collections::BTreeSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::OnceLock;
use tracing::{debug, trace};

use super::credentials::{INLINE_HELPER, PASSWORD_ENV, USERNAME_ENV, UsernamePassword};
use super::session::CommitIdentity;
use super::status::StatusSnapshot;
use crate::error::{GitError, GixError, ProcessError, PublishResult};
use crate::select::RelativePath;

/// Remote name created by `git clone`.
pub const ORIGIN: &str = "origin";

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> PublishResult<Option<String>>;

    /// Full hex id of the commit HEAD points to (None on an unborn branch).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn head_commit(path: &Path) -> PublishResult<Option<String>>;
}

// --- Inspect Trait ---

/// Status inspection.
pub trait GitInspect {
    /// Classify every path of the working copy.
    ///
    /// # Errors
    ///
    /// Returns `GitError::StatusFailed` if git cannot read the working copy.
    fn status(repo_path: &Path) -> PublishResult<StatusSnapshot>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations that modify repository or remote state.
pub trait GitMutation {
    /// Clone `url` into the not yet existing `dest`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::AuthenticationFailed` if credentials were rejected,
    /// `GitError::CloneFailed` for any other failure.
    fn clone(url: &str, dest: &Path, auth: Option<&UsernamePassword>) -> PublishResult<()>;

    /// Stage the given paths in one `git add`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::StageFailed` if git rejects the operation.
    fn add_paths(repo_path: &Path, paths: &BTreeSet<RelativePath>) -> PublishResult<()>;

    /// Remove the given paths from the index in one `git rm`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::StageFailed` if git rejects the operation.
    fn remove_paths(repo_path: &Path, paths: &BTreeSet<RelativePath>) -> PublishResult<()>;

    /// Record the index as a new commit.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` if git refuses to commit.
    fn commit(
        repo_path: &Path,
        message: &str,
        identity: Option<&CommitIdentity>,
    ) -> PublishResult<()>;

    /// Push HEAD to the same-named branch of `remote`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::AuthenticationFailed` if credentials were rejected,
    /// `GitError::PushFailed` if the push was rejected or the transport failed.
    fn push(
        repo_path: &Path,
        remote: &str,
        auth: Option<&UsernamePassword>,
        dry_run: bool,
    ) -> PublishResult<PushReport>;
}

// --- Push report ---

/// One ref line of `git push --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PushedRef {
    /// Status flag: ` ` fast-forward, `+` forced, `*` new, `=` up to date, `!` rejected.
    pub flag: char,
    /// `<local>:<remote>` ref pair.
    pub refspec: String,
    pub summary: String,
}

/// Result of a push.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct PushReport {
    pub dry_run: bool,
    pub refs: Vec<PushedRef>,
}

impl PushReport {
    /// Parse the stdout of `git push --porcelain`.
    #[must_use]
    pub fn parse(stdout: &str, dry_run: bool) -> Self {
        let refs = stdout
            .lines()
            .filter_map(|line| {
                let mut fields = line.splitn(3, '\t');
                let flag = fields.next()?.chars().next()?;
                let refspec = fields.next()?;
                let summary = fields.next().unwrap_or_default();
                Some(PushedRef {
                    flag,
                    refspec: refspec.to_string(),
                    summary: summary.to_string(),
                })
            })
            .collect();
        Self { dry_run, refs }
    }

    /// True if any ref was rejected.
    #[must_use]
    pub fn has_rejections(&self) -> bool {
        self.refs.iter().any(|r| r.flag == '!')
    }
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Read-only, no subprocess.
pub struct GixBackend;

impl GixBackend {
    fn discover(path: &Path) -> PublishResult<gix::Repository> {
        Ok(gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?)
    }
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::discover(path).is_ok()
    }

    fn current_branch(path: &Path) -> PublishResult<Option<String>> {
        let repo = Self::discover(path)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn head_commit(path: &Path) -> PublishResult<Option<String>> {
        let repo = Self::discover(path)?;
        let head = repo.head().map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.id().map(|id| id.to_string()))
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Every write goes through here so that the user's transports, credential
/// helpers and SSH configuration apply unchanged.
pub struct ShellBackend;

static GIT_EXECUTABLE: OnceLock<PathBuf> = OnceLock::new();

/// Fragments of git's stderr that mean the remote rejected our credentials.
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "Authentication failed",
    "could not read Username",
    "could not read Password",
    "Permission denied (publickey",
    "HTTP Basic: Access denied",
];

fn is_auth_failure(stderr: &str) -> bool {
    AUTH_FAILURE_MARKERS.iter().any(|m| stderr.contains(m))
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// NUL-terminated pathspec list for `--pathspec-from-file=- --pathspec-file-nul`.
fn pathspec_input(paths: &BTreeSet<RelativePath>) -> Vec<u8> {
    let mut input = Vec::new();
    for path in paths {
        input.extend_from_slice(path.as_str().as_bytes());
        input.push(0);
    }
    input
}

impl ShellBackend {
    /// Resolve `git` on `PATH` once per process.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if git is not installed.
    pub fn git_executable() -> PublishResult<PathBuf> {
        if let Some(path) = GIT_EXECUTABLE.get() {
            return Ok(path.clone());
        }
        let path = which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
            name: "git".to_string(),
        })?;
        Ok(GIT_EXECUTABLE.get_or_init(|| path).clone())
    }

    /// Build a git invocation. Sets `GCM_INTERACTIVE=never`, `GIT_TERMINAL_PROMPT=0`,
    /// and treats pathspecs literally.
    fn command(cwd: &Path, auth: Option<&UsernamePassword>) -> PublishResult<Command> {
        let mut command = Command::new(Self::git_executable()?);
        command
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GIT_LITERAL_PATHSPECS", "1");
        if let Some(auth) = auth {
            command
                .args(["-c", "credential.helper=", "-c", INLINE_HELPER])
                .env(USERNAME_ENV, auth.username())
                .env(PASSWORD_ENV, auth.password());
        }
        Ok(command)
    }

    /// Run git to completion, returning its output whatever the exit status.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::SpawnFailed` if git cannot be started.
    pub(crate) fn run(
        args: &[&str],
        cwd: &Path,
        auth: Option<&UsernamePassword>,
        stdin: Option<&[u8]>,
    ) -> PublishResult<Output> {
        let mut command = Self::command(cwd, auth)?;
        command
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let rendered = format!("git {}", args.join(" "));
        trace!(command = %rendered, cwd = %cwd.display(), "running git");
        let spawn_failed = |source| ProcessError::SpawnFailed {
            command: rendered.clone(),
            source,
        };

        let mut child = command.spawn().map_err(spawn_failed)?;
        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            pipe.write_all(input).map_err(spawn_failed)?;
        }
        let output = child.wait_with_output().map_err(spawn_failed)?;
        debug!(command = %rendered, status = %output.status, "git finished");
        Ok(output)
    }

    /// Execute a git command and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns `GitError::CommandFailed` on a non-zero exit status.
    pub(crate) fn git_command(args: &[&str], cwd: &Path) -> PublishResult<String> {
        let output = Self::run(args, cwd, None, None)?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: stderr_text(&output),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn status_listing(repo_path: &Path, untracked: &str) -> PublishResult<String> {
        let untracked = format!("--untracked-files={untracked}");
        let mut args = vec![
            "status",
            "--porcelain=v1",
            "-z",
            "--no-renames",
            untracked.as_str(),
        ];
        if untracked.ends_with("all") {
            args.push("--ignored");
        }
        let output = Self::run(&args, repo_path, None, None)?;
        if !output.status.success() {
            return Err(GitError::StatusFailed {
                path: repo_path.display().to_string(),
                message: stderr_text(&output),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn stage(repo_path: &Path, args: &[&str], paths: &BTreeSet<RelativePath>) -> PublishResult<()> {
        let input = pathspec_input(paths);
        let output = Self::run(args, repo_path, None, Some(&input))?;
        if !output.status.success() {
            return Err(GitError::StageFailed {
                path: repo_path.display().to_string(),
                message: stderr_text(&output),
            }
            .into());
        }
        Ok(())
    }
}

impl GitInspect for ShellBackend {
    fn status(repo_path: &Path) -> PublishResult<StatusSnapshot> {
        let entries = Self::status_listing(repo_path, "all")?;
        let folders = Self::status_listing(repo_path, "normal")?;
        StatusSnapshot::from_porcelain(&entries, &folders).map_err(|message| {
            GitError::StatusFailed {
                path: repo_path.display().to_string(),
                message,
            }
            .into()
        })
    }
}

impl GitMutation for ShellBackend {
    fn clone(url: &str, dest: &Path, auth: Option<&UsernamePassword>) -> PublishResult<()> {
        let name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| GitError::CloneFailed {
                url: url.to_string(),
                message: "invalid destination path".to_string(),
            })?;
        let parent = dest
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let output = Self::run(&["clone", "--quiet", "--", url, name], parent, auth, None)?;
        if output.status.success() {
            return Ok(());
        }
        let message = stderr_text(&output);
        let error = if is_auth_failure(&message) {
            GitError::AuthenticationFailed {
                url: url.to_string(),
                message,
            }
        } else {
            GitError::CloneFailed {
                url: url.to_string(),
                message,
            }
        };
        Err(error.into())
    }

    fn add_paths(repo_path: &Path, paths: &BTreeSet<RelativePath>) -> PublishResult<()> {
        Self::stage(
            repo_path,
            &["add", "--pathspec-from-file=-", "--pathspec-file-nul"],
            paths,
        )
    }

    fn remove_paths(repo_path: &Path, paths: &BTreeSet<RelativePath>) -> PublishResult<()> {
        Self::stage(
            repo_path,
            &[
                "rm",
                "--quiet",
                "--ignore-unmatch",
                "--pathspec-from-file=-",
                "--pathspec-file-nul",
            ],
            paths,
        )
    }

    fn commit(
        repo_path: &Path,
        message: &str,
        identity: Option<&CommitIdentity>,
    ) -> PublishResult<()> {
        let overrides = identity.map(CommitIdentity::config_overrides).unwrap_or_default();
        let mut args: Vec<&str> = Vec::new();
        for pair in &overrides {
            args.extend(["-c", pair.as_str()]);
        }
        args.extend(["commit", "--quiet", "--no-verify", "-m", message]);
        Self::git_command(&args, repo_path)?;
        Ok(())
    }

    fn push(
        repo_path: &Path,
        remote: &str,
        auth: Option<&UsernamePassword>,
        dry_run: bool,
    ) -> PublishResult<PushReport> {
        let mut args = vec!["push", "--porcelain"];
        if dry_run {
            args.push("--dry-run");
        }
        args.extend([remote, "HEAD"]);

        let output = Self::run(&args, repo_path, auth, None)?;
        let report = PushReport::parse(&String::from_utf8_lossy(&output.stdout), dry_run);
        if output.status.success() && !report.has_rejections() {
            return Ok(report);
        }

        let stderr = stderr_text(&output);
        let url = Self::git_command(&["remote", "get-url", remote], repo_path)
            .unwrap_or_else(|_| remote.to_string());
        let error = if is_auth_failure(&stderr) {
            GitError::AuthenticationFailed {
                url,
                message: stderr,
            }
        } else {
            let rejected: Vec<String> = report
                .refs
                .iter()
                .filter(|r| r.flag == '!')
                .map(|r| format!("{} ({})", r.refspec, r.summary))
                .collect();
            let message = if rejected.is_empty() {
                stderr
            } else {
                format!("rejected {}", rejected.join(", "))
            };
            GitError::PushFailed { url, message }
        };
        Err(error.into())
    }
}

impl GitQuery for ShellBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::git_command(&["rev-parse", "--is-inside-work-tree"], path).is_ok()
    }

    fn current_branch(path: &Path) -> PublishResult<Option<String>> {
        Self::git_command(&["symbolic-ref", "--short", "HEAD"], path)
            .map_or_else(|_| Ok(None), |branch| Ok(Some(branch)))
    }

    fn head_commit(path: &Path) -> PublishResult<Option<String>> {
        Self::git_command(&["rev-parse", "--verify", "--quiet", "HEAD"], path)
            .map_or_else(|_| Ok(None), |id| Ok(Some(id)))
    }
}
