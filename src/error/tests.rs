// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{ConfigError, ErrorCategory, FsError, GitError, PublishError, PublishResult};
use std::path::Path;

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "publish".to_string(),
        key: "remote_uri".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'remote_uri' in section '[publish]'"
    );
}

#[test]
fn test_invalid_pattern_display() {
    let err: PublishError = ConfigError::InvalidPattern {
        pattern: "glob:[".to_string(),
        message: "unclosed class".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"config error: invalid pattern 'glob:[': unclosed class"
    );
}

#[test]
fn test_publish_error_size() {
    // Box<str> variants (Bailed, Other) are 16 bytes (fat pointer: ptr + len)
    // With discriminant + alignment = 24 bytes
    let size = std::mem::size_of::<PublishError>();
    assert!(size <= 24, "PublishError is {size} bytes, expected <= 24");
}

#[test]
fn test_publish_result_size() {
    let size = std::mem::size_of::<PublishResult<()>>();
    assert!(size <= 24, "PublishResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_error_categories() {
    let cases: Vec<(PublishError, ErrorCategory)> = vec![
        (
            ConfigError::NotADirectory("/tmp/x".into()).into(),
            ErrorCategory::Configuration,
        ),
        (
            GitError::CloneFailed {
                url: "u".into(),
                message: "m".into(),
            }
            .into(),
            ErrorCategory::Connectivity,
        ),
        (
            GitError::AuthenticationFailed {
                url: "u".into(),
                message: "m".into(),
            }
            .into(),
            ErrorCategory::Connectivity,
        ),
        (
            GitError::DirtyClone {
                path: "p".into(),
                summary: "s".into(),
            }
            .into(),
            ErrorCategory::ProtocolViolation,
        ),
        (
            GitError::NothingToCommit { path: "p".into() }.into(),
            ErrorCategory::RepositoryState,
        ),
        (
            FsError::NotFound("p".into()).into(),
            ErrorCategory::Io,
        ),
        (
            std::io::Error::other("boom").into(),
            ErrorCategory::Io,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.category(), expected, "wrong category for {err}");
    }
}

#[test]
fn test_fs_error_from_io_kinds() {
    let path = Path::new("some/file");
    let not_found = FsError::from_io(path, std::io::Error::from(std::io::ErrorKind::NotFound));
    assert!(matches!(not_found, FsError::NotFound(_)));

    let denied = FsError::from_io(
        path,
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    );
    assert!(matches!(denied, FsError::PermissionDenied(_)));

    let other = FsError::from_io(path, std::io::Error::other("disk on fire"));
    assert!(matches!(other, FsError::IoError { .. }));
}
