//! Error types for search operations

use crate::error::AppError;

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while configuring or driving a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Record requested by id is not in the index
    #[error("Record not found: {0}")]
    RecordNotFound(u64),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::InvalidConfiguration(msg) => AppError::Configuration(msg),
            SearchError::RecordNotFound(id) => AppError::NotFound(format!("work {id}")),
        }
    }
}
