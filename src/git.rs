//! Git metadata for the payload: each field is taken from an environment
//! override when present, otherwise queried from the repository.
use std::collections::HashMap;

use crate::error::{Result, SubmitError};
use crate::model::{GitHead, GitInfo};
use crate::vcs::{HeadAttr, VcsClient};

/// Environment variable that overrides the branch name.
pub const BRANCH_ENV_KEY: &str = "GIT_BRANCH";

/// Key-value lookup for overrides.
pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
pub struct ProcessEnv;

impl Env for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl Env for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolve a value from an override, falling back to `default` only when no
/// override is set. An empty result, from either source, is an error.
pub fn resolve<F>(what: &str, override_value: Option<String>, default: F) -> Result<String>
where
    F: FnOnce() -> Result<String>,
{
    let value = match override_value {
        Some(value) => {
            tracing::debug!(field = what, "using override");
            value
        }
        None => default()?,
    };
    if value.is_empty() {
        return Err(SubmitError::Vcs(format!("could not determine {what}")));
    }
    Ok(value)
}

/// Extract the branch name from a decorated ref list such as
/// `HEAD -> main, origin/main`: keep what follows the last `->`, then the
/// first comma-separated token.
pub fn parse_branch(decoration: &str) -> String {
    let after_arrow = decoration.rsplit("->").next().unwrap_or(decoration);
    after_arrow
        .split(',')
        .next()
        .unwrap_or(after_arrow)
        .trim()
        .to_string()
}

/// Resolve the current branch name.
pub fn resolve_branch(vcs: &dyn VcsClient, env: &dyn Env) -> Result<String> {
    let raw = resolve("branch", env.var(BRANCH_ENV_KEY), || vcs.head_ref_decoration())?;
    let branch = parse_branch(&raw);
    // A bare `HEAD` means a detached checkout with no branch pointing at it.
    if branch.is_empty() || branch == "HEAD" {
        return Err(SubmitError::Vcs(format!(
            "could not determine branch from '{raw}'"
        )));
    }
    Ok(branch)
}

fn head_field(vcs: &dyn VcsClient, env: &dyn Env, attr: HeadAttr) -> Result<String> {
    resolve(&attr.to_string(), env.var(attr.env_key()), || {
        vcs.head_attr(attr)
    })
}

/// Resolve every field of the `git` section.
pub fn resolve_git_info(vcs: &dyn VcsClient, env: &dyn Env) -> Result<GitInfo> {
    let head = GitHead {
        id: head_field(vcs, env, HeadAttr::Id)?,
        author_name: head_field(vcs, env, HeadAttr::AuthorName)?,
        author_email: head_field(vcs, env, HeadAttr::AuthorEmail)?,
        committer_name: head_field(vcs, env, HeadAttr::CommitterName)?,
        committer_email: head_field(vcs, env, HeadAttr::CommitterEmail)?,
        message: head_field(vcs, env, HeadAttr::Message)?,
    };
    let branch = resolve_branch(vcs, env)?;
    Ok(GitInfo { head, branch })
}
