use serde::{Deserialize, Serialize};

/// Identifier of a list, allocated by the storage backend.
pub type ListId = i64;

/// Identifier of a todo, unique within its list.
pub type TodoId = i64;

/// A single completable item belonging to exactly one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub name: String,
    pub completed: bool,
}

impl Todo {
    /// Creates a new, incomplete todo.
    pub fn new(id: TodoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            completed: false,
        }
    }

    /// Sets the completion flag.
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// Summary view of a list: aggregate counts only, no todo contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSummary {
    pub id: ListId,
    pub name: String,
    pub total_todos_count: usize,
    pub incomplete_todos_count: usize,
}

impl ListSummary {
    /// True when the list has todos and all of them are completed.
    pub fn is_complete(&self) -> bool {
        is_complete(self.total_todos_count, self.incomplete_todos_count)
    }

    /// Progress label in the form `incomplete/total`.
    pub fn progress(&self) -> String {
        progress_label(self.total_todos_count, self.incomplete_todos_count)
    }
}

/// Detail view of a list with its todos ordered by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: ListId,
    pub name: String,
    pub todos: Vec<Todo>,
    pub total_todos_count: usize,
    pub incomplete_todos_count: usize,
}

impl TodoList {
    /// Builds a list view, deriving the counts from `todos`.
    pub fn new(id: ListId, name: impl Into<String>, todos: Vec<Todo>) -> Self {
        let total_todos_count = todos.len();
        let incomplete_todos_count = todos.iter().filter(|todo| !todo.completed).count();

        Self {
            id,
            name: name.into(),
            todos,
            total_todos_count,
            incomplete_todos_count,
        }
    }

    /// True when the list has todos and all of them are completed.
    pub fn is_complete(&self) -> bool {
        is_complete(self.total_todos_count, self.incomplete_todos_count)
    }

    /// Progress label in the form `incomplete/total`.
    pub fn progress(&self) -> String {
        progress_label(self.total_todos_count, self.incomplete_todos_count)
    }

    /// Drops the todo contents, keeping the counts.
    pub fn summary(&self) -> ListSummary {
        ListSummary {
            id: self.id,
            name: self.name.clone(),
            total_todos_count: self.total_todos_count,
            incomplete_todos_count: self.incomplete_todos_count,
        }
    }
}

fn is_complete(total: usize, incomplete: usize) -> bool {
    total > 0 && incomplete == 0
}

fn progress_label(total: usize, incomplete: usize) -> String {
    format!("{incomplete}/{total}")
}
