use async_trait::async_trait;

use todos_core::storage::{Result, Storage};

use super::SqliteStorage;
use crate::session::SessionId;
use crate::storage::StorageProvider;

/// Opens one SQLite connection per request against a database file.
///
/// All sessions share the same database.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    path: String,
}

impl SqliteProvider {
    /// Prepares the database at `path`, creating the schema when missing.
    pub async fn new(path: &str) -> Result<Self> {
        let storage = SqliteStorage::open(path).await?;
        storage.init_schema().await?;
        Box::new(storage).disconnect().await?;

        tracing::info!(path, "SQLite schema ready");

        Ok(Self {
            path: path.to_string(),
        })
    }
}

#[async_trait]
impl StorageProvider for SqliteProvider {
    async fn connect(&self, _session: &SessionId) -> Result<Box<dyn Storage>> {
        let storage = SqliteStorage::open(&self.path).await?;
        Ok(Box::new(storage))
    }
}
