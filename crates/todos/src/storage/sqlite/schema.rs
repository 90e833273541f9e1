//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Todo ids are scoped to their list, so the todo table
//! is keyed by `(list_id, id)` and new ids are computed from the list's
//! current maximum.

/// Pragmas applied to every new connection.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Lists table
CREATE TABLE IF NOT EXISTS list (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

-- Todos table
CREATE TABLE IF NOT EXISTS todo (
    id INTEGER NOT NULL,
    list_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0,
    PRIMARY KEY (list_id, id),
    FOREIGN KEY (list_id) REFERENCES list(id) ON DELETE CASCADE
);
"#;

// List queries

/// Counts open todos per list.
///
/// A todo is done under the same rules as `conversions::value_to_bool`:
/// non-zero numbers, or the text markers `t`, `true`, `y`, `yes` and `1`
/// ignoring case and surrounding ASCII whitespace. Rows from the LEFT JOIN
/// without a todo are not counted.
pub const SELECT_LIST_SUMMARIES: &str = r#"
SELECT list.id,
       list.name,
       COUNT(todo.id) AS total_todos_count,
       COALESCE(SUM(
           CASE
               WHEN todo.id IS NULL THEN 0
               WHEN typeof(todo.completed) IN ('integer', 'real') AND todo.completed <> 0 THEN 0
               WHEN typeof(todo.completed) = 'text'
                    AND lower(trim(todo.completed, char(32, 9, 10, 12, 13)))
                        IN ('t', 'true', 'y', 'yes', '1') THEN 0
               ELSE 1
           END
       ), 0) AS incomplete_todos_count
FROM list
LEFT JOIN todo ON todo.list_id = list.id
GROUP BY list.id, list.name
ORDER BY list.name ASC, list.id ASC
"#;

pub const SELECT_LIST_BY_ID: &str = r#"
SELECT id, name
FROM list
WHERE id = ?1
"#;

pub const INSERT_LIST: &str = r#"
INSERT INTO list (name)
VALUES (?1)
"#;

pub const UPDATE_LIST_NAME: &str = r#"
UPDATE list
SET name = ?2
WHERE id = ?1
"#;

pub const DELETE_LIST: &str = r#"
DELETE FROM list
WHERE id = ?1
"#;

// Todo queries
pub const SELECT_TODOS_BY_LIST: &str = r#"
SELECT id, name, completed
FROM todo
WHERE list_id = ?1
ORDER BY id ASC
"#;

/// Inserts a todo with the next id of its list; inserts nothing when the
/// list does not exist.
pub const INSERT_TODO: &str = r#"
INSERT INTO todo (id, list_id, name, completed)
SELECT (SELECT COALESCE(MAX(id), 0) + 1 FROM todo WHERE list_id = ?1), list.id, ?2, 0
FROM list
WHERE list.id = ?1
RETURNING id
"#;

pub const UPDATE_TODO_COMPLETED: &str = r#"
UPDATE todo
SET completed = ?3
WHERE list_id = ?1 AND id = ?2
"#;

pub const UPDATE_ALL_TODOS_COMPLETED: &str = r#"
UPDATE todo
SET completed = 1
WHERE list_id = ?1
"#;

pub const DELETE_TODO: &str = r#"
DELETE FROM todo
WHERE list_id = ?1 AND id = ?2
"#;
