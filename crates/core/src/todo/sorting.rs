use super::types::{ListSummary, Todo};

/// Orders lists for display: incomplete lists first, complete lists last.
///
/// The partition is stable, so the storage order (by name) is kept within
/// each group.
pub fn sort_lists_for_display(lists: Vec<ListSummary>) -> Vec<ListSummary> {
    let (complete, mut incomplete): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(ListSummary::is_complete);
    incomplete.extend(complete);
    incomplete
}

/// Orders todos for display: open todos first, completed todos last.
pub fn sort_todos_for_display(todos: Vec<Todo>) -> Vec<Todo> {
    let (completed, mut open): (Vec<_>, Vec<_>) =
        todos.into_iter().partition(|todo| todo.completed);
    open.extend(completed);
    open
}
