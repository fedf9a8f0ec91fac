// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for git-publish.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. git-publish.toml (cwd)
//! 3. --config (repeatable)
//! 4. GITPUBLISH_* env vars
//! 5. CLI overrides (--set, subcommand flags)
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITPUBLISH_PUBLISH__DRY_RUN=true        → publish.dry_run = true
//! GITPUBLISH_PUBLISH__REMOTE_URI=<url>    → publish.remote_uri = "<url>"
//! GITPUBLISH_PUBLISH__SOURCES=a/**,b/**   → publish.sources = ["a/**", "b/**"]
//! GITPUBLISH_GLOBAL__OUTPUT_LOG_LEVEL=5   → global.output_log_level = 5
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{ConfigError, Result};
use crate::git::credentials::{self, CredentialsProvider};
use crate::git::session::CommitIdentity;
use crate::publish::PublishRequest;

use loader::ConfigLoader;
use types::{GlobalConfig, PublishConfig};

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "GITPUBLISH";

/// Configuration file picked up from the current directory.
pub const LOCAL_CONFIG_FILE: &str = "git-publish.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Publish options.
    pub publish: PublishConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use git_publish::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("git-publish.toml")
    ///     .with_env_prefix("GITPUBLISH")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Build a publish request from the `[publish]` section.
    ///
    /// `handle` takes precedence over `publish.username`/`publish.password`.
    /// A relative `project_dir` is taken from the current directory.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` without a commit message or remote,
    /// and `ConfigError::InvalidValue` when only half of the author is set.
    pub fn to_request(
        &self,
        handle: Option<Arc<dyn CredentialsProvider>>,
    ) -> std::result::Result<PublishRequest, ConfigError> {
        let publish = &self.publish;
        let commit_message = required(publish.commit_message.as_deref(), "commit_message")?;
        let remote_uri = required(publish.remote_uri.as_deref(), "remote_uri")?;

        let project_dir = std::path::absolute(
            publish
                .project_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        )
        .map_err(|e| ConfigError::InvalidValue {
            section: "publish".to_string(),
            key: "project_dir".to_string(),
            message: e.to_string(),
        })?;

        let author = match (&publish.author_name, &publish.author_email) {
            (Some(name), Some(email)) => Some(CommitIdentity {
                name: name.clone(),
                email: email.clone(),
            }),
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                return Err(ConfigError::InvalidValue {
                    section: "publish".to_string(),
                    key: "author_name".to_string(),
                    message: "author_name and author_email must be set together".to_string(),
                });
            }
        };

        let credentials = credentials::resolve(
            handle,
            publish.username.as_deref(),
            publish.password.as_deref(),
        );

        Ok(PublishRequest::builder()
            .with_commit_message(commit_message)
            .with_remote_uri(remote_uri)
            .with_credentials(credentials)
            .with_project_dir(project_dir)
            .with_sources(publish.sources.clone())
            .with_ignores(publish.ignores.clone())
            .maybe_with_meta_dir(publish.meta_dir.clone())
            .maybe_with_docs_dir(publish.docs_dir.clone())
            .maybe_with_work_folder(publish.work_folder.clone())
            .maybe_with_local_repository_folder(publish.local_repository_folder.clone())
            .with_debug(publish.debug)
            .with_dry_run(publish.dry_run)
            .with_must_cleanup(publish.must_cleanup)
            .maybe_with_author(author)
            .build())
    }

    /// Format configuration options for display.
    ///
    /// Returns a vector of formatted strings representing all configuration options.
    /// The password is hidden with the `[hidden]` marker.
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_publish_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert("global.log_file".into(), fmt_path(self.global.log_file.as_deref()));
    }

    fn format_publish_options(&self, options: &mut BTreeMap<String, String>) {
        let p = &self.publish;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        options.insert("publish.commit_message".into(), text(&p.commit_message));
        options.insert("publish.remote_uri".into(), text(&p.remote_uri));
        options.insert("publish.username".into(), text(&p.username));
        if p.password.as_deref().is_some_and(|pw| !pw.is_empty()) {
            options.insert("publish.password".into(), "[hidden]".into());
        }
        options.insert("publish.project_dir".into(), fmt_path(p.project_dir.as_deref()));
        options.insert("publish.sources".into(), p.sources.join(", "));
        options.insert("publish.ignores".into(), p.ignores.join(", "));
        options.insert("publish.meta_dir".into(), fmt_path(p.meta_dir.as_deref()));
        options.insert("publish.docs_dir".into(), fmt_path(p.docs_dir.as_deref()));
        options.insert("publish.work_folder".into(), fmt_path(p.work_folder.as_deref()));
        options.insert(
            "publish.local_repository_folder".into(),
            text(&p.local_repository_folder),
        );
        options.insert("publish.debug".into(), p.debug.to_string());
        options.insert("publish.dry_run".into(), p.dry_run.to_string());
        options.insert("publish.must_cleanup".into(), p.must_cleanup.to_string());
        options.insert("publish.author_name".into(), text(&p.author_name));
        options.insert("publish.author_email".into(), text(&p.author_email));
    }
}

fn required<'a>(value: Option<&'a str>, key: &str) -> std::result::Result<&'a str, ConfigError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingKey {
            section: "publish".to_string(),
            key: key.to_string(),
        })
}

fn fmt_path(path: Option<&Path>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}
