//! Shared application state.

use std::sync::Arc;

use crate::config::{Config, StorageBackend};
use crate::storage::{SessionProvider, SessionStore, SqliteProvider, StorageProvider};

/// Shared application state.
///
/// Cloned for each request handler. Holds the storage provider that hands
/// out a request-scoped storage handle.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageProvider>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_provider(SessionProvider::new(SessionStore::new()))
    }
}

impl AppState {
    /// Builds the state for the backend selected by `config`.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        match config.backend() {
            StorageBackend::Sqlite => {
                let path = config.sqlite_path()?;
                tracing::info!(path, "Using SQLite storage");
                let provider = SqliteProvider::new(path).await?;
                Ok(Self::with_provider(provider))
            }
            StorageBackend::Session => {
                tracing::info!("Using session storage");
                Ok(Self::default())
            }
        }
    }

    pub fn with_provider(provider: impl StorageProvider + 'static) -> Self {
        Self {
            storage: Arc::new(provider),
        }
    }
}
