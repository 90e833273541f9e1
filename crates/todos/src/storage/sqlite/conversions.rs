//! SQLite row conversion functions.
//!
//! Pure functions for converting SQLite rows into domain types.

use rusqlite::types::{Type, ValueRef};
use rusqlite::Row;

use todos_core::todo::{ListSummary, Todo};

/// Convert a summary row to a ListSummary.
///
/// Expected columns: id, name, total_todos_count, incomplete_todos_count
pub fn row_to_list_summary(row: &Row) -> rusqlite::Result<ListSummary> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let total: i64 = row.get(2)?;
    let incomplete: i64 = row.get(3)?;

    Ok(ListSummary {
        id,
        name,
        total_todos_count: parse_count(2, total)?,
        incomplete_todos_count: parse_count(3, incomplete)?,
    })
}

/// Convert a list row to its `(id, name)` pair.
///
/// Expected columns: id, name
pub fn row_to_list_header(row: &Row) -> rusqlite::Result<(i64, String)> {
    Ok((row.get(0)?, row.get(1)?))
}

/// Convert a todo row to a Todo.
///
/// Expected columns: id, name, completed
pub fn row_to_todo(row: &Row) -> rusqlite::Result<Todo> {
    let id: i64 = row.get(0)?;
    let name: String = row.get(1)?;
    let completed = value_to_bool(row.get_ref(2)?);

    Ok(Todo {
        id,
        name,
        completed,
    })
}

/// Normalizes a stored boolean.
///
/// Integers are true when non-zero. Text markers `t`, `true`, `y`, `yes` and
/// `1` are true in any case, ignoring surrounding ASCII whitespace.
/// Everything else, including NULL, is false.
///
/// `schema::SELECT_LIST_SUMMARIES` repeats these rules in SQL; keep both in step.
pub fn value_to_bool(value: ValueRef<'_>) -> bool {
    match value {
        ValueRef::Integer(n) => n != 0,
        ValueRef::Real(f) => f != 0.0,
        ValueRef::Text(bytes) => text_to_bool(bytes),
        ValueRef::Null | ValueRef::Blob(_) => false,
    }
}

fn text_to_bool(bytes: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return false;
    };
    matches!(
        text.trim_matches(|c: char| c.is_ascii_whitespace())
            .to_ascii_lowercase()
            .as_str(),
        "t" | "true" | "y" | "yes" | "1"
    )
}

fn parse_count(column: usize, value: i64) -> rusqlite::Result<usize> {
    usize::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_booleans() {
        assert!(value_to_bool(ValueRef::Integer(1)));
        assert!(value_to_bool(ValueRef::Integer(-3)));
        assert!(!value_to_bool(ValueRef::Integer(0)));
    }

    #[test]
    fn test_single_character_markers() {
        assert!(value_to_bool(ValueRef::Text(b"t")));
        assert!(value_to_bool(ValueRef::Text(b"T")));
        assert!(!value_to_bool(ValueRef::Text(b"f")));
    }

    #[test]
    fn test_word_markers() {
        assert!(value_to_bool(ValueRef::Text(b"true")));
        assert!(value_to_bool(ValueRef::Text(b"YES")));
        assert!(value_to_bool(ValueRef::Text(b" yes\t")));
        assert!(!value_to_bool(ValueRef::Text(b"false")));
        assert!(!value_to_bool(ValueRef::Text(b"")));
    }

    #[test]
    fn test_null_and_blob_are_false() {
        assert!(!value_to_bool(ValueRef::Null));
        assert!(!value_to_bool(ValueRef::Blob(&[1])));
    }

    #[test]
    fn test_parse_count_rejects_negative() {
        assert_eq!(parse_count(2, 4).unwrap(), 4);
        assert!(parse_count(2, -1).is_err());
    }

    #[test]
    fn test_row_to_todo_normalizes_text_marker() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let todo = conn
            .query_row("SELECT 4, 'Milk', 't'", [], row_to_todo)
            .unwrap();

        assert_eq!(todo, Todo::new(4, "Milk").with_completed(true));
    }

    #[test]
    fn test_row_to_list_summary() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let summary = conn
            .query_row("SELECT 1, 'Groceries', 2, 1", [], row_to_list_summary)
            .unwrap();

        assert_eq!(summary.id, 1);
        assert_eq!(summary.name, "Groceries");
        assert_eq!(summary.total_todos_count, 2);
        assert_eq!(summary.incomplete_todos_count, 1);
    }
}
