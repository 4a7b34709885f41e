//! Read-only access to the local git repository.
//!
//! The converter only talks to git through [`VcsClient`], so conversion can be
//! exercised against fixtures without spawning processes.
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, SubmitError};

/// A single attribute of the HEAD commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadAttr {
    Id,
    AuthorName,
    AuthorEmail,
    CommitterName,
    CommitterEmail,
    Message,
}

impl HeadAttr {
    pub const ALL: [HeadAttr; 6] = [
        HeadAttr::Id,
        HeadAttr::AuthorName,
        HeadAttr::AuthorEmail,
        HeadAttr::CommitterName,
        HeadAttr::CommitterEmail,
        HeadAttr::Message,
    ];

    /// `git log --pretty=format:` placeholder for this attribute.
    pub fn pretty_format(&self) -> &'static str {
        match self {
            HeadAttr::Id => "%H",
            HeadAttr::AuthorName => "%aN",
            HeadAttr::AuthorEmail => "%ae",
            HeadAttr::CommitterName => "%cN",
            HeadAttr::CommitterEmail => "%ce",
            HeadAttr::Message => "%s",
        }
    }

    /// Environment variable that overrides this attribute.
    pub fn env_key(&self) -> &'static str {
        match self {
            HeadAttr::Id => "GIT_ID",
            HeadAttr::AuthorName => "GIT_AUTHOR_NAME",
            HeadAttr::AuthorEmail => "GIT_AUTHOR_EMAIL",
            HeadAttr::CommitterName => "GIT_COMMITTER_NAME",
            HeadAttr::CommitterEmail => "GIT_COMMITTER_EMAIL",
            HeadAttr::Message => "GIT_MESSAGE",
        }
    }
}

impl std::fmt::Display for HeadAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            HeadAttr::Id => "commit id",
            HeadAttr::AuthorName => "author name",
            HeadAttr::AuthorEmail => "author email",
            HeadAttr::CommitterName => "committer name",
            HeadAttr::CommitterEmail => "committer email",
            HeadAttr::Message => "commit message",
        };
        f.write_str(name)
    }
}

/// The queries the converter needs from version control.
pub trait VcsClient {
    /// Top-level directory of the working tree.
    fn repo_root(&self) -> Result<String>;

    /// Content hash of the file at `path`.
    fn hash_object(&self, path: &str) -> Result<String>;

    /// One attribute of the HEAD commit.
    fn head_attr(&self, attr: HeadAttr) -> Result<String>;

    /// Ref names decorating HEAD, e.g. `HEAD -> main, origin/main`.
    fn head_ref_decoration(&self) -> Result<String>;
}

/// [`VcsClient`] backed by the `git` binary.
#[derive(Debug, Clone, Default)]
pub struct GitCli {
    /// Directory to run git in; the current directory when `None`.
    pub dir: Option<PathBuf>,
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("git");
        if let Some(ref dir) = self.dir {
            cmd.arg("-C").arg(dir);
        }
        tracing::debug!(?args, "running git");
        let output = cmd
            .args(args)
            .output()
            .map_err(|e| SubmitError::Vcs(format!("failed to run git {}: {e}", args.join(" "))))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SubmitError::Vcs(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8(output.stdout).map_err(|_| {
            SubmitError::Vcs(format!("git {} output not valid UTF-8", args.join(" ")))
        })?;
        Ok(trim_newline(&stdout).to_string())
    }

    fn log_head(&self, format: &str) -> Result<String> {
        self.run(&["log", "-1", &format!("--pretty=format:{format}")])
    }
}

impl VcsClient for GitCli {
    fn repo_root(&self) -> Result<String> {
        self.run(&["rev-parse", "--show-toplevel"])
    }

    fn hash_object(&self, path: &str) -> Result<String> {
        self.run(&["hash-object", path])
    }

    fn head_attr(&self, attr: HeadAttr) -> Result<String> {
        self.log_head(attr.pretty_format())
    }

    fn head_ref_decoration(&self) -> Result<String> {
        self.log_head("%D")
    }
}

/// Strip trailing line terminators.
pub fn trim_newline(s: &str) -> &str {
    s.trim_end_matches(['\n', '\r'])
}
