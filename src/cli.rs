//! Command handler functions for the coveralls-submit CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::Config;
use crate::convert;
use crate::git::Env;
use crate::model::UploadResult;
use crate::submit;
use crate::upload::{self, Transport};
use crate::vcs::VcsClient;

fn format_outcome(result: &UploadResult) -> Result<String> {
    if result.success {
        Ok("Submitted report to coveralls.io successfully\n".to_string())
    } else {
        bail!(
            "There was an error submitting the report to coveralls.io (HTTP {}):\n{}",
            result.status_code,
            result.body
        )
    }
}

pub fn cmd_submit(
    report: &Path,
    config: &Config,
    vcs: &dyn VcsClient,
    env: &dyn Env,
    transport: &dyn Transport,
) -> Result<String> {
    let report = convert::load_report(report)
        .with_context(|| format!("Failed to load coverage report {}", report.display()))?;
    let outcome = submit::submit(&report, config, vcs, env, transport)
        .context("Failed to submit coverage report")?;
    tracing::info!(path = %outcome.payload_path.display(), "payload kept");
    format_outcome(&outcome.result)
}

pub fn cmd_convert(
    report: &Path,
    config: &Config,
    vcs: &dyn VcsClient,
    env: &dyn Env,
) -> Result<String> {
    let report = convert::load_report(report)
        .with_context(|| format!("Failed to load coverage report {}", report.display()))?;
    let path = convert::convert(&report, config, vcs, env)
        .context("Failed to convert coverage report")?;
    Ok(format!("{}\n", path.display()))
}

pub fn cmd_upload(payload: &Path, config: &Config, transport: &dyn Transport) -> Result<String> {
    let result = upload::upload(payload, &config.endpoint, transport)
        .with_context(|| format!("Failed to upload {}", payload.display()))?;
    format_outcome(&result)
}
