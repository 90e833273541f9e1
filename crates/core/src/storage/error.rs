use thiserror::Error;

/// Errors raised by a storage backend.
///
/// Missing rows are not errors: reads return `None` and mutations against
/// unknown ids affect nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
