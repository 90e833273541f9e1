use serde::Deserialize;

/// Form payload for adding a todo to a list.
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(default)]
    pub todo: String,
}

impl TodoForm {
    pub fn name(&self) -> &str {
        self.todo.trim()
    }
}

/// Form payload for toggling a todo.
#[derive(Debug, Deserialize)]
pub struct CompletionForm {
    #[serde(default)]
    pub completed: String,
}

impl CompletionForm {
    /// Only the literal `true` marks the todo complete.
    pub fn is_completed(&self) -> bool {
        self.completed == "true"
    }
}
