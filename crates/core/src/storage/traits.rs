use async_trait::async_trait;

use crate::todo::{ListId, ListSummary, TodoId, TodoList};

use super::Result;

/// Persistence operations needed by the web layer.
///
/// A value of this trait is a request-scoped handle: it is acquired when a
/// request starts and released with [`Storage::disconnect`] when it ends.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Summaries of every list, ordered by name (ties by id).
    async fn all_lists(&self) -> Result<Vec<ListSummary>>;

    /// Whether a list with this id exists.
    async fn contains(&self, list_id: ListId) -> Result<bool>;

    /// Inserts a new empty list and returns its id.
    ///
    /// Name validation is the caller's job.
    async fn add_list(&self, name: &str) -> Result<ListId>;

    /// Deletes a list together with its todos.
    async fn delete_list(&self, list_id: ListId) -> Result<()>;

    /// Gets a list with its todos ordered by id.
    async fn find_list(&self, list_id: ListId) -> Result<Option<TodoList>>;

    /// Renames a list.
    async fn edit_list_name(&self, list_id: ListId, name: &str) -> Result<()>;

    /// Appends an incomplete todo to a list.
    ///
    /// Returns the allocated id, or `None` when the list does not exist.
    async fn create_todo(&self, list_id: ListId, name: &str) -> Result<Option<TodoId>>;

    /// Deletes a todo from a list.
    async fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> Result<()>;

    /// Sets the completion flag of a todo.
    async fn mark_todo_complete(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> Result<()>;

    /// Marks every todo of a list as completed.
    async fn mark_all_todos_complete(&self, list_id: ListId) -> Result<()>;

    /// Releases the handle and whatever connection it holds.
    async fn disconnect(self: Box<Self>) -> Result<()>;
}
