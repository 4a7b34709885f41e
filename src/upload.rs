//! Multipart upload of a payload file to the Coveralls jobs API.
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SubmitError};
use crate::model::UploadResult;

/// Form field carrying the payload.
pub const FORM_FIELD: &str = "json_file";
/// Filename declared for the payload part.
pub const FORM_FILENAME: &str = "coveralls_report.json";
/// Content type declared for the payload part.
pub const FORM_CONTENT_TYPE: &str = "text/plain";

const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

/// A response that made it back from the server, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends a single POST. Implementations return `SubmitError::Transport` only
/// when no response was obtained at all.
pub trait Transport {
    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse>;
}

/// [`Transport`] over `ureq`, with TLS certificate verification.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .user_agent(concat!("coveralls-submit/", env!("CARGO_PKG_VERSION")))
                .build(),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn post(&self, url: &str, content_type: &str, body: &[u8]) -> Result<HttpResponse> {
        let resp = self
            .agent
            .post(url)
            .set("Content-Type", content_type)
            .send_bytes(body);
        // ureq reports 4xx/5xx as errors; those still carry a response.
        let resp = match resp {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(SubmitError::Transport(t.to_string())),
        };
        let status = resp.status();
        let body = read_body(resp.into_reader(), status)?;
        Ok(HttpResponse { status, body })
    }
}

/// Read a response body. A body cut short keeps whatever arrived, since the
/// status is already known and the text is only used for diagnostics.
fn read_body(reader: impl Read, status: u16) -> Result<String> {
    let mut buf = Vec::new();
    if let Err(e) = reader.take(MAX_RESPONSE_BYTES).read_to_end(&mut buf) {
        if buf.is_empty() {
            return Err(SubmitError::Transport(format!(
                "failed to read response body (HTTP {status}): {e}"
            )));
        }
        tracing::warn!(status, error = %e, "response body truncated");
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// A `multipart/form-data` body with a single file part.
pub struct MultipartBody {
    pub boundary: String,
    pub bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Pick a boundary from `generate` that does not occur in `content`.
pub fn boundary_for(content: &[u8], mut generate: impl FnMut() -> String) -> String {
    loop {
        let boundary = generate();
        let marker = boundary.as_bytes();
        if !content.windows(marker.len()).any(|w| w == marker) {
            return boundary;
        }
    }
}

fn random_boundary() -> String {
    format!("coveralls-{}", uuid::Uuid::new_v4().simple())
}

/// Build the form body with one file part.
pub fn multipart_body(
    boundary: &str,
    field: &str,
    filename: &str,
    content_type: &str,
    content: &[u8],
) -> MultipartBody {
    let mut bytes = Vec::with_capacity(content.len() + 256);
    bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    bytes.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n")
            .as_bytes(),
    );
    bytes.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    bytes.extend_from_slice(content);
    bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    MultipartBody {
        boundary: boundary.to_string(),
        bytes,
    }
}

/// Classify a response: only an exact `200` counts as success.
pub fn classify(resp: HttpResponse) -> UploadResult {
    UploadResult {
        success: resp.status == 200,
        status_code: resp.status,
        body: resp.body,
    }
}

/// Upload the payload file at `path` to `endpoint`. One attempt, no retry.
pub fn upload(path: &Path, endpoint: &str, transport: &dyn Transport) -> Result<UploadResult> {
    let content = std::fs::read(path)?;
    let body = multipart_body(
        &boundary_for(&content, random_boundary),
        FORM_FIELD,
        FORM_FILENAME,
        FORM_CONTENT_TYPE,
        &content,
    );

    eprintln!("Uploading coverage report to {endpoint} ...");
    let resp = transport.post(endpoint, &body.content_type(), &body.bytes)?;
    tracing::debug!(status = resp.status, "coveralls responded");
    Ok(classify(resp))
}
