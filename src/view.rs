//! Render pass: one full recomputation of what the user sees.
//!
//! Each interaction opens a fresh store connection, applies at most one mutation,
//! reads the task list, reads it again for the category tally, and returns the result
//! as a `View`. Nothing is cached between passes.

use std::fmt;
use std::path::Path;

use chrono::NaiveDate;

use crate::chart::{self, Slice};
use crate::db::{Store, StoreError};
use crate::task::Task;

/// Mutation requested by the user for this pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    Add {
        description: String,
        due_date: Option<NaiveDate>,
    },
    Complete(i64),
    Reopen(i64),
    Delete(i64),
}

/// Outcome of the requested action, reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Added(i64),
    Completed(i64),
    Reopened(i64),
    Deleted(i64),
    /// The action referred to a task that no longer exists.
    Missing(i64),
    /// The add request could not reach the store.
    AddFailed,
    Failed(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::AddFailed | Notice::Failed(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Added(id) => write!(f, "Task #{id} added successfully!"),
            Notice::Completed(id) => write!(f, "Task #{id} marked complete"),
            Notice::Reopened(id) => write!(f, "Task #{id} reopened"),
            Notice::Deleted(id) => write!(f, "Task #{id} deleted"),
            Notice::Missing(id) => write!(f, "Task #{id} not found"),
            Notice::AddFailed => f.write_str("Error: Unable to add task."),
            Notice::Failed(e) => write!(f, "Error: {e}"),
        }
    }
}

/// Snapshot handed to the renderer.
#[derive(Debug, Clone, Default)]
pub struct View {
    /// Set when the store could not be opened; the task and chart sections are skipped.
    pub unavailable: Option<String>,
    /// Set when the tasks could not be read; the sections show this instead of data.
    pub read_error: Option<String>,
    pub notice: Option<Notice>,
    pub tasks: Vec<Task>,
    pub slices: Vec<Slice>,
}

impl View {
    pub fn is_available(&self) -> bool {
        self.unavailable.is_none()
    }
}

/// Run one render pass against the database at `db_path`.
pub fn render_pass(db_path: &Path, action: Action) -> View {
    let store = match Store::connect(db_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "task store unavailable");
            let notice = match action {
                Action::None => None,
                Action::Add { .. } => Some(Notice::AddFailed),
                _ => Some(Notice::Failed("Unable to update task.".into())),
            };
            return View {
                unavailable: Some(e.to_string()),
                notice,
                ..View::default()
            };
        }
    };

    let notice = match apply(&store, action) {
        Ok(notice) => notice,
        Err(e) => {
            tracing::error!(error = %e, "task action failed");
            Some(Notice::Failed(e.to_string()))
        }
    };

    let mut view = View {
        notice,
        ..View::default()
    };
    match read_sections(&store) {
        Ok((tasks, slices)) => {
            view.tasks = tasks;
            view.slices = slices;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read tasks");
            view.read_error = Some(e.to_string());
        }
    }
    view
}

fn apply(store: &Store, action: Action) -> Result<Option<Notice>, StoreError> {
    let found = |hit: bool, id: i64, notice: Notice| if hit { notice } else { Notice::Missing(id) };
    let notice = match action {
        Action::None => return Ok(None),
        Action::Add {
            description,
            due_date,
        } => Notice::Added(store.insert(&description, due_date)?),
        Action::Complete(id) => found(store.mark_complete(id)?, id, Notice::Completed(id)),
        Action::Reopen(id) => found(store.reopen(id)?, id, Notice::Reopened(id)),
        Action::Delete(id) => found(store.delete(id)?, id, Notice::Deleted(id)),
    };
    Ok(Some(notice))
}

/// Table rows, then an independent second scan for the chart.
fn read_sections(store: &Store) -> Result<(Vec<Task>, Vec<Slice>), StoreError> {
    let tasks = store.list_all()?;
    let for_chart = store.list_all()?;
    let slices = chart::slices(&chart::tally(&for_chart));
    Ok((tasks, slices))
}
