//! Data types on both sides of the conversion: the coverage report we are
//! handed (targets → files → lines) and the Coveralls job payload we emit.

use serde::{Deserialize, Serialize};

/// A single source line as seen by the coverage tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Line {
    pub executable: bool,
    /// Only meaningful when `executable` is true.
    #[serde(default)]
    pub execution_count: u64,
}

impl Line {
    pub fn executed(count: u64) -> Self {
        Self {
            executable: true,
            execution_count: count,
        }
    }

    pub fn non_executable() -> Self {
        Self::default()
    }
}

/// Coverage data for a single source file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceFile {
    /// Absolute path of the file on disk.
    pub location: String,
    #[serde(default)]
    pub ignored: bool,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl SourceFile {
    pub fn new(location: impl Into<String>, lines: Vec<Line>) -> Self {
        Self {
            location: location.into(),
            ignored: false,
            lines,
        }
    }
}

/// A build product and the source files it was built from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub name: String,
    pub files: Vec<SourceFile>,
}

/// The complete coverage report handed to the converter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverageReport {
    pub targets: Vec<Target>,
}

/// One entry of `source_files` in the job payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSourceFile {
    /// Path relative to the repository root.
    pub name: String,
    pub source_digest: String,
    /// One entry per source line; `None` for non-executable lines.
    pub coverage: Vec<Option<u64>>,
}

/// Commit details sent under `git.head`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHead {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub committer_name: String,
    pub committer_email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitInfo {
    pub head: GitHead,
    pub branch: String,
}

/// The job document POSTed to Coveralls. Field names are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub service_job_id: String,
    pub service_name: String,
    pub repo_token: String,
    pub source_files: Vec<EncodedSourceFile>,
    pub git: GitInfo,
}

/// Outcome of a single upload attempt that got an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub status_code: u16,
    pub body: String,
}
