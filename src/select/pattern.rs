// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Pattern compilation.
//!
//! ```text
//! "src/**"            --> "glob:src/**"   --> wax::Glob
//! "glob:*.md"         --> unchanged       --> wax::Glob
//! "regex:.*\.java"    --> unchanged       --> regex::Regex  ^(?:...)$
//! ```
//!
//! Syntax detection is a pure function of the pattern text.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use wax::{Glob, Program as _};

use super::path::RelativePath;
use crate::error::ConfigError;

pub const GLOB_PREFIX: &str = "glob:";
pub const REGEX_PREFIX: &str = "regex:";

/// Pattern syntax, taken from the `glob:` / `regex:` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSyntax {
    Glob,
    Regex,
}

/// Adds the `glob:` prefix unless the pattern already names its syntax.
#[must_use]
pub fn with_syntax_prefix(pattern: &str) -> Cow<'_, str> {
    if pattern.starts_with(GLOB_PREFIX) || pattern.starts_with(REGEX_PREFIX) {
        Cow::Borrowed(pattern)
    } else {
        Cow::Owned(format!("{GLOB_PREFIX}{pattern}"))
    }
}

enum Compiled {
    Glob(Glob<'static>),
    Regex(Regex),
}

/// A compiled pattern that tests relative paths.
pub struct Matcher {
    pattern: Box<str>,
    compiled: Compiled,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Matcher").field(&self.pattern).finish()
    }
}

impl Matcher {
    /// Compile a pattern, defaulting to glob syntax.
    ///
    /// Globs follow wax: `**/` also matches zero folders, so `**/*.java`
    /// selects a top-level `A.java`. Use `*/**/*.java` or a `regex:` pattern
    /// to require at least one folder.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if the glob or regex is malformed.
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let normalized = with_syntax_prefix(pattern);
        let invalid = |message: String| ConfigError::InvalidPattern {
            pattern: normalized.to_string(),
            message,
        };

        let compiled = if let Some(body) = normalized.strip_prefix(REGEX_PREFIX) {
            let anchored = format!("^(?:{body})$");
            Compiled::Regex(Regex::new(&anchored).map_err(|e| invalid(e.to_string()))?)
        } else {
            let body = normalized
                .strip_prefix(GLOB_PREFIX)
                .unwrap_or(normalized.as_ref());
            let glob = Glob::new(body).map_err(|e| invalid(e.to_string()))?;
            Compiled::Glob(glob.into_owned())
        };

        Ok(Self {
            pattern: normalized.into_owned().into_boxed_str(),
            compiled,
        })
    }

    /// The normalized pattern text, including its syntax prefix.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn syntax(&self) -> PatternSyntax {
        match self.compiled {
            Compiled::Glob(_) => PatternSyntax::Glob,
            Compiled::Regex(_) => PatternSyntax::Regex,
        }
    }

    /// Test a relative path; regex patterns must match the whole path.
    #[must_use]
    pub fn is_match(&self, path: &RelativePath) -> bool {
        match &self.compiled {
            Compiled::Glob(glob) => glob.is_match(path.as_str()),
            Compiled::Regex(regex) => regex.is_match(path.as_str()),
        }
    }
}

/// Ordered collection of matchers, used only for membership tests.
#[derive(Debug, Default)]
pub struct MatcherSet {
    matchers: Vec<Matcher>,
}

impl MatcherSet {
    /// Compile a raw pattern list.
    ///
    /// Blank entries are dropped, leading whitespace is stripped, and entries
    /// starting with `#` are comments. Compilation keeps the input order.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidPattern` encountered.
    pub fn parse<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let matchers = raw
            .into_iter()
            .filter(|line| !line.as_ref().trim().is_empty())
            .map(|line| line.as_ref().trim_start().to_string())
            .filter(|line| !line.starts_with('#'))
            .map(|line| Matcher::compile(&line))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// Append another set's matchers after this set's.
    #[must_use]
    pub fn chain(mut self, other: Self) -> Self {
        self.matchers.extend(other.matchers);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// True if any matcher in the set matches `path`.
    #[must_use]
    pub fn matches_any(&self, path: &RelativePath) -> bool {
        self.matchers.iter().any(|m| m.is_match(path))
    }

    /// Normalized pattern texts in compilation order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.matchers.iter().map(Matcher::pattern).collect()
    }
}
