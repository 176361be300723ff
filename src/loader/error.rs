//! Error types for index loading

use crate::error::AppError;
use std::path::PathBuf;

/// Errors that can occur while fetching or decoding the index document.
///
/// These never escape [`crate::loader::IndexRepository::ensure_loaded`]; they
/// surface through [`crate::loader::LoadState::Failed`] and the logs.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed index document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Index document is not a JSON array")]
    NotAnArray,
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Io { source, .. } => AppError::Io(source),
            LoadError::Http(e) => AppError::Network(e.to_string()),
            LoadError::Status { .. } => AppError::Network(err.to_string()),
            LoadError::Malformed(e) => AppError::Serialization(e.to_string()),
            LoadError::NotAnArray => AppError::Load(err.to_string()),
        }
    }
}
