//! Command implementations for the CLI interface.
//!
//! This module contains the command handlers behind each subcommand: adding, listing,
//! completing, reopening and deleting tasks, the category summary, and the TUI launcher.
//! Each handler opens its own store connection and reports failures on stderr with a
//! non-zero exit code.

use std::path::Path;

use clap::Subcommand;
use clap_complete::{generate, Shell};
use thiserror::Error;

use crate::chart::{self, Slice, PALETTE_HEX};
use crate::db::*;
use crate::fields::Category;
use crate::task::Task;
use crate::tui::run::run_tui;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface (the default).
    Ui,

    /// Add a new task. Its category is inferred from the description.
    Add {
        /// What needs doing.
        description: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", a weekday, "next friday", or "in Nd".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks.
    List {
        /// Only show tasks in this category.
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Hide completed tasks.
        #[arg(long)]
        pending: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Mark a task as completed.
    Complete {
        id: i64,
    },

    /// Mark a completed task as not completed.
    Reopen {
        id: i64,
    },

    /// Delete a completed task.
    Delete {
        id: i64,
    },

    /// Show how tasks are spread across categories.
    Stats,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn open_store(db_path: &Path) -> Store {
    match Store::connect(db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Unable to create database connection. {e}");
            std::process::exit(1);
        }
    }
}

fn load_tasks(store: &Store) -> Vec<Task> {
    match store.list_all() {
        Ok(tasks) => tasks,
        Err(e) => {
            eprintln!("Failed to read tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Launch the terminal user interface.
pub fn cmd_ui(db_path: &Path) {
    tracing::info!(db = %db_path.display(), "starting terminal ui");
    if let Err(e) = run_tui(db_path) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
    tracing::info!("terminal ui closed");
}

/// Add a new task to the database.
pub fn cmd_add(db_path: &Path, description: String, due: Option<String>) {
    let due_date = match due.as_deref() {
        None => None,
        Some(raw) => match parse_due_input(raw) {
            Some(d) => Some(d),
            None => {
                eprintln!(
                    "Unrecognised due date. Use YYYY-MM-DD, 'today', 'tomorrow', a weekday, or 'in Nd'."
                );
                std::process::exit(1);
            }
        },
    };

    let store = open_store(db_path);
    match store.insert(&description, due_date) {
        Ok(id) => match store.get(id) {
            Ok(Some(task)) => println!("Task #{id} added successfully! ({})", task.category),
            _ => println!("Task #{id} added successfully!"),
        },
        Err(e) => {
            eprintln!("Error: Unable to add task. {e}");
            std::process::exit(1);
        }
    }
}

/// Keep the tasks matching the list filters, in store order.
pub fn filter_tasks(tasks: Vec<Task>, category: Option<Category>, pending: bool) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| category.map_or(true, |c| t.category == c))
        .filter(|t| !pending || !t.completed)
        .collect()
}

/// List tasks as a table or as JSON.
pub fn cmd_list(db_path: &Path, category: Option<Category>, pending: bool, json: bool) {
    let store = open_store(db_path);
    let tasks = filter_tasks(load_tasks(&store), category, pending);

    if json {
        match serde_json::to_string_pretty(&tasks) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialise tasks: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    if tasks.is_empty() {
        println!("No tasks available. Add some tasks to get started!");
        return;
    }
    print_table(&tasks);
}

/// Result of a command that changes one task.
#[derive(Debug, PartialEq, Eq)]
pub enum Change {
    Applied,
    /// No task has that id; the store is left untouched.
    NotFound,
}

/// Failures of the task-changing commands.
#[derive(Debug, Error)]
pub enum CmdError {
    #[error("Task {0} is not completed. Run `supertask complete {0}` first.")]
    NotCompleted(i64),

    #[error("Failed to update task: {0}")]
    Store(#[from] StoreError),
}

fn change(matched: bool) -> Change {
    if matched {
        Change::Applied
    } else {
        Change::NotFound
    }
}

pub fn complete_task(store: &Store, id: i64) -> Result<Change, CmdError> {
    Ok(change(store.mark_complete(id)?))
}

pub fn reopen_task(store: &Store, id: i64) -> Result<Change, CmdError> {
    Ok(change(store.reopen(id)?))
}

/// Delete a task, refusing tasks that are not completed yet.
pub fn delete_task(store: &Store, id: i64) -> Result<Change, CmdError> {
    match store.get(id)? {
        None => Ok(Change::NotFound),
        Some(task) if !task.completed => Err(CmdError::NotCompleted(id)),
        Some(_) => Ok(change(store.delete(id)?)),
    }
}

/// Print the outcome of a task-changing command; errors exit with status 1.
fn report(id: i64, done: &str, result: Result<Change, CmdError>) {
    match result {
        Ok(Change::Applied) => println!("{done} {id}"),
        Ok(Change::NotFound) => println!("Task {id} not found."),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Mark a task as completed.
pub fn cmd_complete(db_path: &Path, id: i64) {
    report(id, "Completed", complete_task(&open_store(db_path), id));
}

/// Mark a task as not completed.
pub fn cmd_reopen(db_path: &Path, id: i64) {
    report(id, "Reopened", reopen_task(&open_store(db_path), id));
}

/// Delete a task. Only completed tasks can be deleted.
pub fn cmd_delete(db_path: &Path, id: i64) {
    report(id, "Deleted", delete_task(&open_store(db_path), id));
}

/// One line of the category summary.
pub fn format_slice(slice: &Slice) -> String {
    format!(
        "{:<9} {:>4}  {:>5.1}%  {}",
        slice.category.label(),
        slice.count,
        slice.fraction * 100.0,
        PALETTE_HEX[slice.color % PALETTE_HEX.len()]
    )
}

/// Print the category tally in chart order.
pub fn cmd_stats(db_path: &Path) {
    let store = open_store(db_path);
    let tasks = load_tasks(&store);
    let slices = chart::slices(&chart::tally(&tasks));
    if slices.is_empty() {
        println!("No tasks available. Add some tasks to see the categories!");
        return;
    }
    println!("{:<9} {:>4}  {:>6}  {}", "Category", "Tasks", "Share", "Colour");
    for slice in &slices {
        println!("{}", format_slice(slice));
    }
    println!("{:<9} {:>4}", "Total", tasks.len());
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
