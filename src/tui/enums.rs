//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    /// Task table has focus.
    TaskList,
    /// The add-task sidebar has focus.
    AddTask,
    Help,
    /// Waiting for the user to confirm deleting a task.
    Confirm(i64),
}
