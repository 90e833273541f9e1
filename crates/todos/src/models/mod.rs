mod list;
mod todo;

pub use list::ListForm;
pub use todo::{CompletionForm, TodoForm};
