mod error;
mod operations;
mod sorting;
mod types;

pub use error::NameError;
pub use operations::{
    next_todo_id, validate_list_name, validate_todo_name, MAX_NAME_LENGTH, MIN_NAME_LENGTH,
};
pub use sorting::{sort_lists_for_display, sort_todos_for_display};
pub use types::{ListId, ListSummary, Todo, TodoId, TodoList};
