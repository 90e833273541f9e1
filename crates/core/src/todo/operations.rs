use super::error::NameError;
use super::types::{ListSummary, Todo, TodoId};

/// Shortest accepted list or todo name, in characters.
pub const MIN_NAME_LENGTH: usize = 1;
/// Longest accepted list or todo name, in characters.
pub const MAX_NAME_LENGTH: usize = 100;

/// Checks a list name against the length rule and the names of the other lists.
///
/// Uniqueness is only checked against `lists`, so two concurrent requests can
/// still create duplicates; nothing in storage enforces it.
pub fn validate_list_name(name: &str, lists: &[ListSummary]) -> Result<(), NameError> {
    let name = name.trim();
    if !has_valid_length(name) {
        return Err(NameError::ListNameLength);
    }
    if lists.iter().any(|list| list.name == name) {
        return Err(NameError::ListNameTaken);
    }
    Ok(())
}

/// Checks a todo name against the length rule and its sibling todos.
pub fn validate_todo_name(name: &str, todos: &[Todo]) -> Result<(), NameError> {
    let name = name.trim();
    if !has_valid_length(name) {
        return Err(NameError::TodoNameLength);
    }
    if todos.iter().any(|todo| todo.name == name) {
        return Err(NameError::TodoNameTaken);
    }
    Ok(())
}

/// Id for the next todo of a list: the largest existing id plus one, or 1.
pub fn next_todo_id(ids: impl IntoIterator<Item = TodoId>) -> TodoId {
    ids.into_iter().max().unwrap_or(0) + 1
}

fn has_valid_length(name: &str) -> bool {
    (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&name.chars().count())
}
