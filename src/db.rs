//! SQLite task store and shared formatting helpers.
//!
//! This module provides the `Store` handle over the local `tasks` table, the error
//! type for store failures, and the date parsing and table formatting utilities used
//! by both the CLI and the terminal interface.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Duration, Local, NaiveDate};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use thiserror::Error;

use crate::categorize::categorize;
use crate::fields::Category;
use crate::task::Task;

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    due_date DATE,
    category TEXT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT 0
);";
const INSERT_TASK: &str =
    "INSERT INTO tasks (description, due_date, category, completed) VALUES (?1, ?2, ?3, ?4)";
const SELECT_TASKS: &str =
    "SELECT id, description, due_date, category, completed FROM tasks ORDER BY id";
const SELECT_TASK: &str =
    "SELECT id, description, due_date, category, completed FROM tasks WHERE id = ?1";
const UPDATE_COMPLETED: &str = "UPDATE tasks SET completed = ?1 WHERE id = ?2";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// Errors raised by the task store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened or its schema could not be ensured.
    #[error("unable to open task store at {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.label()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Connection to the task table in a local SQLite file.
///
/// Every statement runs in autocommit mode, so each mutation is durable as soon as
/// the call returns.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the database at `path`, creating the file and the `tasks` table if needed.
    ///
    /// Parent directories are not created; a missing or read-only location is reported
    /// as [`StoreError::Unavailable`].
    pub fn connect(path: &Path) -> Result<Self, StoreError> {
        let unavailable = |source| StoreError::Unavailable {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(unavailable)?;
        conn.execute_batch(SCHEMA_TASKS).map_err(unavailable)?;
        tracing::debug!(path = %path.display(), "task store connected");
        Ok(Self { conn })
    }

    /// Insert a new, not yet completed task and return its id.
    pub fn insert(&self, description: &str, due_date: Option<NaiveDate>) -> Result<i64, StoreError> {
        self.insert_with_status(description, due_date, false)
    }

    /// Insert a task with an explicit completion flag and return its id.
    ///
    /// The category is derived from `description` here and never recomputed.
    pub fn insert_with_status(
        &self,
        description: &str,
        due_date: Option<NaiveDate>,
        completed: bool,
    ) -> Result<i64, StoreError> {
        let category = categorize(description);
        self.conn
            .execute(INSERT_TASK, params![description, due_date, category, completed])?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, %category, "task inserted");
        Ok(id)
    }

    /// All tasks in insertion order.
    pub fn list_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let tasks = stmt
            .query_map([], task_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Get a task by ID.
    pub fn get(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let task = self
            .conn
            .query_row(SELECT_TASK, params![id], task_from_row)
            .optional()?;
        Ok(task)
    }

    /// Mark a task as completed. Returns false, without error, if no such task exists.
    pub fn mark_complete(&self, id: i64) -> Result<bool, StoreError> {
        self.set_completed(id, true)
    }

    /// Clear the completed flag. Returns false, without error, if no such task exists.
    pub fn reopen(&self, id: i64) -> Result<bool, StoreError> {
        self.set_completed(id, false)
    }

    /// Delete a task. Returns false, without error, if no such task exists.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let affected = self.conn.execute(DELETE_TASK, params![id])?;
        tracing::debug!(id, affected, "task delete");
        Ok(affected > 0)
    }

    fn set_completed(&self, id: i64, completed: bool) -> Result<bool, StoreError> {
        let affected = self.conn.execute(UPDATE_COMPLETED, params![completed, id])?;
        tracing::debug!(id, completed, affected, "task completion updated");
        Ok(affected > 0)
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        due_date: row.get(2)?,
        category: row.get(3)?,
        completed: row.get(4)?,
    })
}

/// Parse human-readable due date input relative to the local date.
///
/// See [`parse_due_input_from`] for the accepted forms.
pub fn parse_due_input(s: &str) -> Option<NaiveDate> {
    parse_due_input_from(s, Local::now().date_naive())
}

/// Parse due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "monday" .. "sunday" (and three letter forms), "next friday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input_from(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(days) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(days));
        }
        if let Some(weeks) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(weeks));
        }
        return None;
    }

    let (next_week, day_name) = match s.strip_prefix("next ") {
        Some(rest) => (true, rest.trim()),
        None => (false, s.as_str()),
    };
    if let Some(target) = weekday_index(day_name) {
        let current = today.weekday().num_days_from_monday() as i64;
        let mut ahead = (target - current).rem_euclid(7);
        if next_week {
            ahead += 7;
        }
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    const WEEKDAYS: [&str; 7] = [
        "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
    ];
    WEEKDAYS
        .iter()
        .position(|day| *day == name || (name.len() == 3 && day.starts_with(name)))
        .map(|i| i as i64)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

/// Format a due date as ISO text, or "-" when absent.
pub fn format_due(due: Option<NaiveDate>) -> String {
    due.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

/// Checkbox marker used for the completion column.
pub fn format_completed(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task]) {
    println!(
        "{:<5} {:<5} {:<10} {:<10} {:<9} {}",
        "ID", "Done", "Due", "Relative", "Category", "Task"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        println!(
            "{:<5} {:<5} {:<10} {:<10} {:<9} {}",
            t.id,
            format_completed(t.completed),
            format_due(t.due_date),
            format_due_relative(t.due_date, today),
            t.category.label(),
            truncate(&t.description, 60)
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = Store::connect(&dir.path().join("todo.db")).expect("failed to open store");
        (dir, store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insert_then_list_round_trips() {
        let (_dir, store) = test_store();
        let id = store.insert("Finish work report", Some(date(2024, 6, 1))).unwrap();

        let tasks = store.list_all().unwrap();
        assert_eq!(
            tasks,
            vec![Task {
                id,
                description: "Finish work report".into(),
                due_date: Some(date(2024, 6, 1)),
                category: Category::Work,
                completed: false,
            }]
        );
    }

    #[test]
    fn test_missing_due_date_and_empty_description() {
        let (_dir, store) = test_store();
        let id = store.insert("", None).unwrap();

        let task = store.get(id).unwrap().unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.category, Category::Other);
    }

    #[test]
    fn test_insert_with_status() {
        let (_dir, store) = test_store();
        let id = store.insert_with_status("Personal errand", None, true).unwrap();

        let task = store.get(id).unwrap().unwrap();
        assert!(task.completed);
        assert_eq!(task.category, Category::Personal);
    }

    #[test]
    fn test_list_is_in_insertion_order() {
        let (_dir, store) = test_store();
        let ids: Vec<i64> = ["b", "a", "c"]
            .iter()
            .map(|d| store.insert(d, None).unwrap())
            .collect();

        let listed: Vec<i64> = store.list_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(listed, ids);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let (_dir, store) = test_store();
        let first = store.insert("one", None).unwrap();
        let second = store.insert("two", None).unwrap();
        store.delete(second).unwrap();

        let third = store.insert("three", None).unwrap();
        assert!(third > second);
        assert!(second > first);
    }

    #[test]
    fn test_complete_and_delete_scenario() {
        let (_dir, store) = test_store();
        let id = store.insert("Finish work report", Some(date(2024, 6, 1))).unwrap();

        assert!(store.mark_complete(id).unwrap());
        assert!(store.get(id).unwrap().unwrap().completed);

        assert!(store.delete(id).unwrap());
        assert!(store.list_all().unwrap().iter().all(|t| t.id != id));
    }

    #[test]
    fn test_delete_twice_is_a_no_op() {
        let (_dir, store) = test_store();
        let id = store.insert("Read book", None).unwrap();

        assert!(store.delete(id).unwrap());
        assert!(!store.delete(id).unwrap());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_mark_complete_missing_id_leaves_other_rows() {
        let (_dir, store) = test_store();
        let id = store.insert("Read book", None).unwrap();

        assert!(!store.mark_complete(id + 100).unwrap());
        let tasks = store.list_all().unwrap();
        assert_eq!(tasks.len(), 1);
        assert!(!tasks[0].completed);
    }

    #[test]
    fn test_reopen_clears_completion() {
        let (_dir, store) = test_store();
        let id = store.insert("Work meeting", None).unwrap();
        store.mark_complete(id).unwrap();

        assert!(store.reopen(id).unwrap());
        assert!(!store.get(id).unwrap().unwrap().completed);
    }

    #[test]
    fn test_unknown_stored_category_fails_decoding() {
        let (_dir, store) = test_store();
        store.insert("Work meeting", None).unwrap();
        store
            .conn
            .execute(
                "INSERT INTO tasks (description, category) VALUES ('Sweep', 'Chores')",
                [],
            )
            .unwrap();

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)), "{err:?}");
        assert!(err.to_string().contains("unknown category 'Chores'"), "{err}");
    }

    #[test]
    fn test_data_survives_reconnect() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todo.db");
        let id = Store::connect(&path).unwrap().insert("Work meeting", None).unwrap();

        let store = Store::connect(&path).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().description, "Work meeting");
    }

    #[test]
    fn test_connect_to_unwritable_path_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("todo.db");

        let err = Store::connect(&path).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable { .. }));
        assert!(err.to_string().contains("unable to open task store"));
    }

    #[test]
    fn test_parse_due_input_forms() {
        // 2024-06-05 is a Wednesday.
        let today = date(2024, 6, 5);
        assert_eq!(parse_due_input_from("today", today), Some(today));
        assert_eq!(parse_due_input_from(" Tomorrow ", today), Some(date(2024, 6, 6)));
        assert_eq!(parse_due_input_from("yesterday", today), Some(date(2024, 6, 4)));
        assert_eq!(parse_due_input_from("in 3d", today), Some(date(2024, 6, 8)));
        assert_eq!(parse_due_input_from("in 2w", today), Some(date(2024, 6, 19)));
        assert_eq!(parse_due_input_from("friday", today), Some(date(2024, 6, 7)));
        assert_eq!(parse_due_input_from("fri", today), Some(date(2024, 6, 7)));
        assert_eq!(parse_due_input_from("wednesday", today), Some(today));
        assert_eq!(parse_due_input_from("next monday", today), Some(date(2024, 6, 17)));
        assert_eq!(parse_due_input_from("2024-12-31", today), Some(date(2024, 12, 31)));
        assert_eq!(parse_due_input_from("in a while", today), None);
        assert_eq!(parse_due_input_from("31/12/2024", today), None);
    }

    #[test]
    fn test_format_due_relative() {
        let today = date(2024, 6, 5);
        assert_eq!(format_due_relative(None, today), "-");
        assert_eq!(format_due_relative(Some(today), today), "today");
        assert_eq!(format_due_relative(Some(date(2024, 6, 6)), today), "tomorrow");
        assert_eq!(format_due_relative(Some(date(2024, 6, 9)), today), "in 4d");
        assert_eq!(format_due_relative(Some(date(2024, 6, 3)), today), "2d late");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("a longer description", 8), "a longe…");
    }
}
