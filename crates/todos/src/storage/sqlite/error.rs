//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `StorageError` from
//! `todos_core::storage`.

use todos_core::storage::StorageError;

/// Maps a rusqlite error to a StorageError.
///
/// - `SQLITE_CANTOPEN` → `StorageError::ConnectionFailed`
/// - Type conversion failures → `StorageError::InvalidData`
/// - All other errors → `StorageError::QueryFailed`
pub fn map_rusqlite_error(err: &rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.code == rusqlite::ErrorCode::CannotOpen =>
        {
            StorageError::ConnectionFailed(format!("Cannot open database: {err}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::IntegralValueOutOfRange(..)
        | rusqlite::Error::InvalidColumnType(..) => StorageError::InvalidData(err.to_string()),

        _ => StorageError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a StorageError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(err: tokio_rusqlite::Error) -> StorageError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => map_rusqlite_error(rusqlite_err),
        tokio_rusqlite::Error::ConnectionClosed => {
            StorageError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Close((_, rusqlite_err)) => {
            StorageError::ConnectionFailed(format!("Failed to close connection: {rusqlite_err}"))
        }
        _ => StorageError::QueryFailed(err.to_string()),
    }
}
