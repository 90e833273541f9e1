//! Pure functions for mapping storage errors to HTTP status codes.

use super::StorageError;

/// Maps a [`StorageError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `QueryFailed` -> 500 (Internal Server Error)
/// - `InvalidData` -> 500 (Internal Server Error)
///
/// # Examples
///
/// ```
/// use todos_core::storage::{storage_error_to_status_code, StorageError};
///
/// let error = StorageError::ConnectionFailed("database is locked".to_string());
/// assert_eq!(storage_error_to_status_code(&error), 503);
/// ```
pub fn storage_error_to_status_code(error: &StorageError) -> u16 {
    match error {
        StorageError::ConnectionFailed(_) => 503,
        StorageError::QueryFailed(_) => 500,
        StorageError::InvalidData(_) => 500,
    }
}
