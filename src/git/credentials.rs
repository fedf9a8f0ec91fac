// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Credentials for clone and push.
//!
//! ```text
//! handle (Arc<dyn CredentialsProvider>)   highest
//! username/password -> StaticCredentials
//! AmbientCredentials (ssh agent, git helpers)  lowest
//! ```
//!
//! Secrets reach git through an inline credential helper that reads
//! [`USERNAME_ENV`] / [`PASSWORD_ENV`] from the child environment.

use std::fmt;
use std::sync::Arc;

/// Child environment variable carrying the username.
pub const USERNAME_ENV: &str = "GIT_PUBLISH_USERNAME";

/// Child environment variable carrying the password or token.
pub const PASSWORD_ENV: &str = "GIT_PUBLISH_PASSWORD";

/// Credential helper answering `get` from the two environment variables.
pub(crate) const INLINE_HELPER: &str = concat!(
    "credential.helper=!f() { test \"$1\" = get && ",
    "echo \"username=${GIT_PUBLISH_USERNAME}\" && ",
    "echo \"password=${GIT_PUBLISH_PASSWORD}\"; }; f"
);

/// A username and password (or token).
#[derive(Clone, PartialEq, Eq)]
pub struct UsernamePassword {
    username: String,
    password: String,
}

impl UsernamePassword {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for UsernamePassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePassword")
            .field("username", &self.username)
            .field("password", &"[hidden]")
            .finish()
    }
}

/// Supplies credentials for authenticated remote operations.
///
/// `None` leaves authentication to git's own configuration.
pub trait CredentialsProvider: fmt::Debug + Send + Sync {
    fn credentials(&self) -> Option<UsernamePassword>;
}

/// Fixed username and password.
#[derive(Debug, Clone)]
pub struct StaticCredentials(UsernamePassword);

impl StaticCredentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self(UsernamePassword::new(username, password))
    }
}

impl CredentialsProvider for StaticCredentials {
    fn credentials(&self) -> Option<UsernamePassword> {
        Some(self.0.clone())
    }
}

/// Defers to whatever git is configured with.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmbientCredentials;

impl CredentialsProvider for AmbientCredentials {
    fn credentials(&self) -> Option<UsernamePassword> {
        None
    }
}

/// Pick the provider by precedence: handle, then username/password, then ambient.
///
/// A username alone is accepted with an empty password (token-as-username hosts).
#[must_use]
pub fn resolve(
    handle: Option<Arc<dyn CredentialsProvider>>,
    username: Option<&str>,
    password: Option<&str>,
) -> Arc<dyn CredentialsProvider> {
    if let Some(handle) = handle {
        return handle;
    }
    match username.filter(|u| !u.is_empty()) {
        Some(user) => Arc::new(StaticCredentials::new(user, password.unwrap_or_default())),
        None => Arc::new(AmbientCredentials),
    }
}
