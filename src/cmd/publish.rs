// git-publish: mirror project files into a remote git repository
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `publish` command.

use anyhow::Context;
use tracing::info;

use crate::cli::publish::PublishArgs;
use crate::config::Config;
use crate::error::Result;
use crate::publish::{PublishOutcome, publish};

/// Run one publish and report it on stdout.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete, the run failed, or
/// the working copy could not be removed afterwards.
pub fn run_publish_command(args: &PublishArgs, config: &Config) -> Result<()> {
    let request = config
        .to_request(None)
        .context("incomplete publish configuration")?;
    info!(
        remote = request.remote_uri(),
        project = %request.project_dir().display(),
        dry_run = request.is_dry_run(),
        "publishing"
    );

    let outcome = publish(&request);
    report(&outcome, args.json)?;
    outcome.into_result()?;
    Ok(())
}

fn report(outcome: &PublishOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
    } else {
        for line in outcome.diagnostic() {
            println!("{line}");
        }
    }
    Ok(())
}
