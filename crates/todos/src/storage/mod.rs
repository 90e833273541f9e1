//! Storage backends and the per-request connection seam.

pub mod session;
pub mod sqlite;

use async_trait::async_trait;

use todos_core::storage::{Result, Storage, StorageError};

use crate::session::SessionId;

pub use session::{SessionProvider, SessionStore};
pub use sqlite::SqliteProvider;

/// Hands out a [`Storage`] handle for the duration of one request.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Acquires storage for the given session.
    async fn connect(&self, session: &SessionId) -> Result<Box<dyn Storage>>;
}

/// Disconnects `storage` and then yields the request outcome.
///
/// A disconnect failure replaces a successful outcome. When the request
/// already failed, its error wins and the disconnect failure is only logged.
pub async fn release<T, E>(
    storage: Box<dyn Storage>,
    outcome: std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<StorageError>,
{
    match (storage.disconnect().await, outcome) {
        (Ok(()), outcome) => outcome,
        (Err(e), Ok(_)) => Err(e.into()),
        (Err(e), Err(original)) => {
            tracing::error!(error = %e, "Failed to release storage");
            Err(original)
        }
    }
}
