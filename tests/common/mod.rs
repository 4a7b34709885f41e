#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use coveralls_submit::error::{Result, SubmitError};
use coveralls_submit::model::{CoverageReport, Line, SourceFile, Target};
use coveralls_submit::upload::{HttpResponse, Transport};
use coveralls_submit::vcs::{HeadAttr, VcsClient};

/// Fixture-backed VCS that records every query it answers.
pub struct FakeVcs {
    pub root: String,
    pub decoration: String,
    pub attrs: HashMap<HeadAttr, String>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn new(root: &str) -> Self {
        let attrs = HashMap::from([
            (HeadAttr::Id, "4f2c1b7e9a0d3c5e8f6a1b2c3d4e5f6a7b8c9d0e".to_string()),
            (HeadAttr::AuthorName, "Ada Lovelace".to_string()),
            (HeadAttr::AuthorEmail, "ada@example.com".to_string()),
            (HeadAttr::CommitterName, "Grace Hopper".to_string()),
            (HeadAttr::CommitterEmail, "grace@example.com".to_string()),
            (HeadAttr::Message, "Add coverage upload".to_string()),
        ]);
        Self {
            root: root.to_string(),
            decoration: "HEAD -> main, origin/main".to_string(),
            attrs,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn called(&self, call: &str) -> bool {
        self.calls.borrow().iter().any(|c| c == call)
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

/// Digest derived from the path so tests can tell files apart.
pub fn digest_for(path: &str) -> String {
    format!("digest:{path}")
}

impl VcsClient for FakeVcs {
    fn repo_root(&self) -> Result<String> {
        self.record("repo_root".to_string());
        Ok(self.root.clone())
    }

    fn hash_object(&self, path: &str) -> Result<String> {
        self.record(format!("hash_object {path}"));
        Ok(digest_for(path))
    }

    fn head_attr(&self, attr: HeadAttr) -> Result<String> {
        self.record(format!("head_attr {}", attr.pretty_format()));
        Ok(self.attrs.get(&attr).cloned().unwrap_or_default())
    }

    fn head_ref_decoration(&self) -> Result<String> {
        self.record("head_ref_decoration".to_string());
        Ok(self.decoration.clone())
    }
}

/// Records the request and answers with a canned response or failure.
pub struct StubTransport {
    pub response: Option<HttpResponse>,
    pub requests: RefCell<Vec<(String, String, Vec<u8>)>>,
}

impl StubTransport {
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            response: Some(HttpResponse {
                status,
                body: body.to_string(),
            }),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            response: None,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl Transport for StubTransport {
    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse> {
        self.requests
            .borrow_mut()
            .push((url.to_string(), content_type.to_string(), body.to_vec()));
        self.response
            .clone()
            .ok_or_else(|| SubmitError::Transport("connection refused".to_string()))
    }
}

pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Two targets: the first has an ignored file between two real ones.
pub fn sample_report() -> CoverageReport {
    CoverageReport {
        targets: vec![
            Target {
                name: "App".to_string(),
                files: vec![
                    SourceFile::new(
                        "/repo/src/main.rs",
                        vec![
                            Line::non_executable(),
                            Line::executed(4),
                            Line::executed(0),
                            Line::non_executable(),
                        ],
                    ),
                    SourceFile {
                        location: "/repo/src/generated.rs".to_string(),
                        ignored: true,
                        lines: vec![Line::executed(1)],
                    },
                    SourceFile::new("/repo/src/lib.rs", vec![Line::executed(10)]),
                ],
            },
            Target {
                name: "AppTests".to_string(),
                files: vec![SourceFile::new(
                    "/repo/tests/it.rs",
                    vec![Line::executed(2), Line::non_executable()],
                )],
            },
        ],
    }
}
