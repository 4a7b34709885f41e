use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("git error: {0}")]
    Vcs(String),

    #[error("Source file '{path}' is not inside repository root '{root}'")]
    PathOutsideRoot { path: String, root: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, SubmitError>;
