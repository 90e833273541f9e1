//! SQLite storage implementation.
//!
//! Implements the `Storage` trait from `todos_core::storage` over a single
//! `tokio_rusqlite` connection. One value is opened per request.

use std::fmt::Debug;

use async_trait::async_trait;
use tokio_rusqlite::Connection;

use todos_core::storage::{Result, Storage, StorageError};
use todos_core::todo::{ListId, ListSummary, TodoId, TodoList};

use super::conversions::{row_to_list_header, row_to_list_summary, row_to_todo};
use super::error::map_tokio_rusqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Logs a statement and its bound parameters before it runs.
fn log_query(statement: &str, params: &[&dyn Debug]) {
    let statement = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    tracing::info!(%statement, ?params, "query");
}

/// SQLite-backed storage handle.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens a connection to a file-based database.
    ///
    /// The schema is expected to exist already; see [`SqliteStorage::init_schema`].
    pub async fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let storage = Self { conn };
        storage.apply_pragmas().await?;
        Ok(storage)
    }

    /// Opens an in-memory database with the schema in place.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        let storage = Self { conn };
        storage.apply_pragmas().await?;
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Creates the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(schema::CREATE_TABLES)
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn apply_pragmas(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(schema::CONNECTION_PRAGMAS)
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))
    }

    /// Runs a statement that changes rows and returns how many it touched.
    async fn execute<P>(&self, statement: &'static str, params: P) -> Result<usize>
    where
        P: rusqlite::Params + Debug + Send + 'static,
    {
        self.conn
            .call(move |conn| {
                log_query(statement, &[&params]);
                let rows = conn.execute(statement, params).map_err(wrap_err)?;
                Ok(rows)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn all_lists(&self) -> Result<Vec<ListSummary>> {
        self.conn
            .call(|conn| {
                log_query(schema::SELECT_LIST_SUMMARIES, &[]);
                let mut stmt = conn
                    .prepare(schema::SELECT_LIST_SUMMARIES)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_list_summary).map_err(wrap_err)?;

                let mut lists = Vec::new();
                for row_result in rows {
                    lists.push(row_result.map_err(wrap_err)?);
                }
                Ok(lists)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn contains(&self, list_id: ListId) -> Result<bool> {
        self.conn
            .call(move |conn| {
                log_query(schema::SELECT_LIST_BY_ID, &[&list_id]);
                let mut stmt = conn.prepare(schema::SELECT_LIST_BY_ID).map_err(wrap_err)?;
                stmt.exists([list_id]).map_err(wrap_err)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn add_list(&self, name: &str) -> Result<ListId> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                log_query(schema::INSERT_LIST, &[&name]);
                conn.execute(schema::INSERT_LIST, [&name])
                    .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn delete_list(&self, list_id: ListId) -> Result<()> {
        // Todos go with the list through the ON DELETE CASCADE foreign key.
        let rows = self.execute(schema::DELETE_LIST, [list_id]).await?;
        tracing::debug!(list_id, rows, "Deleted list");
        Ok(())
    }

    async fn find_list(&self, list_id: ListId) -> Result<Option<TodoList>> {
        self.conn
            .call(move |conn| {
                log_query(schema::SELECT_LIST_BY_ID, &[&list_id]);
                let (id, name) = match conn.query_row(
                    schema::SELECT_LIST_BY_ID,
                    [list_id],
                    row_to_list_header,
                ) {
                    Ok(header) => header,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };

                log_query(schema::SELECT_TODOS_BY_LIST, &[&list_id]);
                let mut stmt = conn
                    .prepare(schema::SELECT_TODOS_BY_LIST)
                    .map_err(wrap_err)?;
                let rows = stmt.query_map([list_id], row_to_todo).map_err(wrap_err)?;

                let mut todos = Vec::new();
                for row_result in rows {
                    todos.push(row_result.map_err(wrap_err)?);
                }
                Ok(Some(TodoList::new(id, name, todos)))
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn edit_list_name(&self, list_id: ListId, name: &str) -> Result<()> {
        let params = (list_id, name.to_string());
        let rows = self.execute(schema::UPDATE_LIST_NAME, params).await?;
        tracing::debug!(list_id, rows, "Renamed list");
        Ok(())
    }

    async fn create_todo(&self, list_id: ListId, name: &str) -> Result<Option<TodoId>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                log_query(schema::INSERT_TODO, &[&list_id, &name]);
                let mut stmt = conn.prepare(schema::INSERT_TODO).map_err(wrap_err)?;
                let inserted =
                    stmt.query_row(rusqlite::params![list_id, name], |row| row.get::<_, TodoId>(0));
                match inserted {
                    Ok(todo_id) => Ok(Some(todo_id)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> Result<()> {
        let rows = self
            .execute(schema::DELETE_TODO, [list_id, todo_id])
            .await?;
        tracing::debug!(list_id, todo_id, rows, "Deleted todo");
        Ok(())
    }

    async fn mark_todo_complete(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> Result<()> {
        let rows = self
            .execute(schema::UPDATE_TODO_COMPLETED, (list_id, todo_id, completed))
            .await?;
        tracing::debug!(list_id, todo_id, completed, rows, "Updated todo");
        Ok(())
    }

    async fn mark_all_todos_complete(&self, list_id: ListId) -> Result<()> {
        let rows = self
            .execute(schema::UPDATE_ALL_TODOS_COMPLETED, [list_id])
            .await?;
        tracing::debug!(list_id, rows, "Completed all todos");
        Ok(())
    }

    async fn disconnect(self: Box<Self>) -> Result<()> {
        self.conn.close().await.map_err(map_tokio_rusqlite_error)
    }
}
