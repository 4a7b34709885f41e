//! Single entry point: convert a report, then upload the resulting payload.
use std::path::PathBuf;

use crate::config::Config;
use crate::convert;
use crate::error::Result;
use crate::git::Env;
use crate::model::{CoverageReport, UploadResult};
use crate::upload::{self, Transport};
use crate::vcs::VcsClient;

/// What a `submit` call produced. The payload file is left on disk.
#[derive(Debug)]
pub struct SubmitOutcome {
    pub payload_path: PathBuf,
    pub result: UploadResult,
}

/// Convert `report` and upload it. Conversion errors abort before any
/// network call; a rejected upload is reported through `result.success`.
pub fn submit(
    report: &CoverageReport,
    config: &Config,
    vcs: &dyn VcsClient,
    env: &dyn Env,
    transport: &dyn Transport,
) -> Result<SubmitOutcome> {
    let payload_path = convert::convert(report, config, vcs, env)?;
    let result = upload::upload(&payload_path, &config.endpoint, transport)?;
    Ok(SubmitOutcome {
        payload_path,
        result,
    })
}
