//! Conversion of a [`CoverageReport`] into the Coveralls job payload, and
//! persistence of that payload to a temp file for upload.
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Result, SubmitError};
use crate::git::{self, Env};
use crate::model::{CoverageReport, EncodedSourceFile, Line, SubmissionPayload};
use crate::vcs::{trim_newline, VcsClient};

/// Encode lines positionally: the execution count for executable lines,
/// `None` for everything else.
pub fn encode_lines(lines: &[Line]) -> Vec<Option<u64>> {
    lines
        .iter()
        .map(|l| l.executable.then_some(l.execution_count))
        .collect()
}

/// Normalize the repository root so it ends with exactly one `/`.
pub fn normalize_root(root: &str) -> String {
    let root = trim_newline(root).trim_end_matches('/');
    format!("{root}/")
}

/// Path of `location` relative to `root` (which must end with `/`).
pub fn relative_path(location: &str, root: &str) -> Result<String> {
    match location.strip_prefix(root) {
        Some(rel) if !rel.is_empty() => Ok(rel.to_string()),
        _ => Err(SubmitError::PathOutsideRoot {
            path: location.to_string(),
            root: root.to_string(),
        }),
    }
}

/// Encode every non-ignored file of every target, in report order.
pub fn encode_source_files(
    report: &CoverageReport,
    vcs: &dyn VcsClient,
) -> Result<Vec<EncodedSourceFile>> {
    let root = normalize_root(&vcs.repo_root()?);
    let mut source_files = Vec::new();

    for target in &report.targets {
        for file in target.files.iter().filter(|f| !f.ignored) {
            let name = relative_path(&file.location, &root)?;
            let source_digest = vcs.hash_object(&file.location)?;
            if source_digest.is_empty() {
                return Err(SubmitError::Vcs(format!(
                    "empty content hash for '{}'",
                    file.location
                )));
            }
            source_files.push(EncodedSourceFile {
                name,
                source_digest,
                coverage: encode_lines(&file.lines),
            });
        }
    }

    Ok(source_files)
}

/// Build the full payload in memory.
pub fn convert_report(
    report: &CoverageReport,
    config: &Config,
    vcs: &dyn VcsClient,
    env: &dyn Env,
) -> Result<SubmissionPayload> {
    let source_files = encode_source_files(report, vcs)?;
    let git = git::resolve_git_info(vcs, env)?;
    Ok(SubmissionPayload {
        service_job_id: config.service_job_id.clone(),
        service_name: config.service_name.clone(),
        repo_token: config.repo_token.clone(),
        source_files,
        git,
    })
}

/// Serialize `payload` as pretty JSON into a new, uniquely named file under
/// `tmp_dir` (created if needed). The file is kept on disk.
pub fn write_payload(payload: &SubmissionPayload, tmp_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(tmp_dir)?;

    let mut json = serde_json::to_string_pretty(payload)?;
    json.push('\n');

    let mut file = tempfile::Builder::new()
        .prefix("coveralls_report")
        .suffix(".json")
        .tempfile_in(tmp_dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| SubmitError::Io(e.error))?;
    tracing::debug!(path = %path.display(), "wrote coveralls payload");
    Ok(path)
}

/// Convert the report and persist it, returning the payload file path.
pub fn convert(
    report: &CoverageReport,
    config: &Config,
    vcs: &dyn VcsClient,
    env: &dyn Env,
) -> Result<PathBuf> {
    let payload = convert_report(report, config, vcs, env)?;
    write_payload(&payload, &config.tmp_dir())
}

/// Read a coverage report from its JSON representation.
pub fn load_report(path: &Path) -> Result<CoverageReport> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_lines() {
        let lines = vec![
            Line::non_executable(),
            Line::executed(3),
            Line::executed(0),
            Line::non_executable(),
        ];
        assert_eq!(encode_lines(&lines), vec![None, Some(3), Some(0), None]);
    }

    #[test]
    fn test_encode_lines_ignores_count_on_non_executable() {
        let lines = vec![Line {
            executable: false,
            execution_count: 7,
        }];
        assert_eq!(encode_lines(&lines), vec![None]);
    }

    #[test]
    fn test_encode_lines_empty() {
        assert!(encode_lines(&[]).is_empty());
    }

    #[test]
    fn test_normalize_root() {
        assert_eq!(normalize_root("/home/me/repo\n"), "/home/me/repo/");
        assert_eq!(normalize_root("/home/me/repo/"), "/home/me/repo/");
        assert_eq!(normalize_root("/home/me/repo"), "/home/me/repo/");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path("/repo/src/main.rs", "/repo/").unwrap(),
            "src/main.rs"
        );
    }

    #[test]
    fn test_relative_path_outside_root() {
        let err = relative_path("/elsewhere/main.rs", "/repo/").unwrap_err();
        assert!(matches!(err, SubmitError::PathOutsideRoot { .. }));

        // Sibling directory sharing a prefix is still outside.
        assert!(relative_path("/repo2/main.rs", "/repo/").is_err());
        assert!(relative_path("/repo/", "/repo/").is_err());
    }

    #[test]
    fn test_load_report_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(
            &path,
            r#"{"targets":[{"files":[{"location":"/r/a.rs","lines":[{"executable":true,"execution_count":2},{"executable":false}]}]}]}"#,
        )
        .unwrap();

        let report = load_report(&path).unwrap();
        let file = &report.targets[0].files[0];
        assert_eq!(report.targets[0].name, "");
        assert!(!file.ignored);
        assert_eq!(file.lines, vec![Line::executed(2), Line::non_executable()]);
    }

    #[test]
    fn test_load_report_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(load_report(&path), Err(SubmitError::Json(_))));
    }
}
