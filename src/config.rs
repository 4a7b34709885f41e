use std::path::PathBuf;

/// The Coveralls jobs API.
pub const COVERALLS_JOBS_URL: &str = "https://coveralls.io/api/v1/jobs";

/// Everything the pipeline needs from the host configuration. Values are
/// used verbatim in the payload or in path construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub service_job_id: String,
    pub service_name: String,
    pub repo_token: String,
    /// The payload is written under `<output_dir>/tmp`.
    pub output_dir: PathBuf,
    pub endpoint: String,
}

impl Config {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            service_job_id: String::new(),
            service_name: String::new(),
            repo_token: String::new(),
            output_dir: output_dir.into(),
            endpoint: COVERALLS_JOBS_URL.to_string(),
        }
    }

    /// Directory that receives converted payload files.
    pub fn tmp_dir(&self) -> PathBuf {
        self.output_dir.join("tmp")
    }
}
