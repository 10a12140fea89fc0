use std::path::PathBuf;

use thiserror::Error;

/// Failure of a single request attempt against one credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("Quota exhausted: {message}")]
    RateLimited { message: String },

    #[error("{message}")]
    Transient { message: String },

    #[error("Empty response from model")]
    EmptyResponse,
}

impl AttemptError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AttemptError::RateLimited { .. })
    }
}

/// Terminal failure of an analysis call, the only error callers of
/// [`crate::InferenceClient::analyze`] ever see.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No API key found: {source_name} is empty or unset")]
    Configuration { source_name: String },

    #[error("Analysis failed. {cause}")]
    Exhausted { cause: String },
}

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Cannot read video file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a video file (detected {mime_type})")]
    NotVideo { path: PathBuf, mime_type: String },

    #[error("{path} is too large ({size} bytes, limit is {limit} bytes)")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
