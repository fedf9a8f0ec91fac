// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            PublishError (~24 bytes)
//!                     |
//!   +------+------+---+----+------+--------+
//!   |      |      |        |      |        |
//!   v      v      v        v      v        v
//! Bail    Cfg    Git    Process   Fs    Io/Other
//!         Box    Box      Box     Box   Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Config   ParseError, MissingKey, InvalidPattern, NotADirectory
//!   Git      CloneFailed, DirtyClone, NothingToCommit, PushFailed
//!   Process  ExecutableNotFound, SpawnFailed
//!   Fs       NotFound, PermissionDenied, IoError
//!
//! category():
//!   Configuration | Connectivity | ProtocolViolation
//!   RepositoryState | Io
//! ```

use serde::Serialize;
use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`PublishError`].
pub type PublishResult<T> = std::result::Result<T, PublishError>;

/// Top-level error type of the publish engine.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Fatal error that should terminate the run.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

/// Create a fatal [`PublishError::Bailed`].
pub fn bail_out(message: impl Into<String>) -> PublishError {
    PublishError::Bailed(message.into().into_boxed_str())
}

/// Coarse classification used by callers to tell failures apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Malformed pattern, missing option, non-directory path.
    Configuration,
    /// Clone or push failed at the transport level, or credentials were rejected.
    Connectivity,
    /// The fresh clone was not clean.
    ProtocolViolation,
    /// The working copy could not be inspected or mutated.
    RepositoryState,
    /// Local filesystem failure during synchronization or cleanup.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration => write!(f, "configuration"),
            Self::Connectivity => write!(f, "connectivity"),
            Self::ProtocolViolation => write!(f, "protocol violation"),
            Self::RepositoryState => write!(f, "repository state"),
            Self::Io => write!(f, "io"),
        }
    }
}

impl PublishError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Configuration,
            Self::Git(git) => git.category(),
            Self::Process(process) => match process.as_ref() {
                ProcessError::ExecutableNotFound { .. } => ErrorCategory::Configuration,
                _ => ErrorCategory::RepositoryState,
            },
            Self::Fs(_) | Self::Io(_) => ErrorCategory::Io,
            Self::Bailed(_) | Self::Other(_) => ErrorCategory::RepositoryState,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for PublishError {
                fn from(err: $error) -> Self {
                    PublishError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    GitError => Git,
    ProcessError => Process,
    FsError => Fs,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),

    /// Repository has no worktree (bare repository).
    #[error("repository has no worktree (bare repository)")]
    BareRepository,
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// The remote rejected the supplied credentials.
    #[error("authentication failed for {url}: {message}")]
    AuthenticationFailed { url: String, message: String },

    /// A fresh clone reported local changes.
    #[error("clone produced a dirty repository at {path}: {summary}")]
    DirtyClone { path: String, summary: String },

    /// Status of the working copy could not be determined.
    #[error("failed to read status of {path}: {message}")]
    StatusFailed { path: String, message: String },

    /// Adding or removing paths from the index failed.
    #[error("failed to stage changes in {path}: {message}")]
    StageFailed { path: String, message: String },

    /// Commit was requested without staged changes.
    #[error("nothing to commit in {path}")]
    NothingToCommit { path: String },

    /// Push was rejected or the transport failed.
    #[error("failed to push to {url}: {message}")]
    PushFailed { url: String, message: String },
}

impl GitError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::CloneFailed { .. } | Self::AuthenticationFailed { .. } | Self::PushFailed { .. } => {
                ErrorCategory::Connectivity
            }
            Self::DirtyClone { .. } => ErrorCategory::ProtocolViolation,
            Self::RepoNotFound { .. }
            | Self::CommandFailed { .. }
            | Self::Gix(_)
            | Self::StatusFailed { .. }
            | Self::StageFailed { .. }
            | Self::NothingToCommit { .. } => ErrorCategory::RepositoryState,
        }
    }
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },

    /// A file pattern could not be compiled.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A path that must be a directory is something else.
    #[error("not a directory: {0}")]
    NotADirectory(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classify an I/O error raised while touching `path`.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        let display = path.display().to_string();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(display),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(display),
            _ => Self::IoError {
                path: display,
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests;
