//! # SuperTask - The Ultimate To-Do List
//!
//! A single-user to-do list backed by a local SQLite file, with a terminal user
//! interface (TUI) and a small command-line surface for scripting.
//!
//! ## Key Features
//!
//! - **Keyword Categories**: Tasks mentioning "work" are filed under Work, "personal" under
//!   Personal, and everything else under Other. The category is fixed at creation.
//! - **Due Dates**: ISO dates or relative input such as "tomorrow", "friday" or "in 3d".
//! - **Completion Toggles**: Completing a task keeps it in the list; completed tasks can
//!   then be deleted on request.
//! - **Category Chart**: A pie chart of tasks per category, drawn in the terminal.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI (the default when no subcommand is given)
//! supertask
//!
//! # Add a task via CLI
//! supertask add "Prepare work presentation" --due friday
//!
//! # List open tasks
//! supertask list --pending
//!
//! # Complete, then delete
//! supertask complete 1
//! supertask delete 1
//! ```
//!
//! Data is stored in `./todo.db` unless `--db` points elsewhere. The TUI writes its log
//! next to the database (`todo.log`); other commands log to stderr. Set `RUST_LOG` to
//! change verbosity.

use clap::Parser;

pub mod categorize;
pub mod chart;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod logging;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use logging::LogTarget;

fn main() {
    let mut cli = Cli::parse();
    let command = cli.command.take().unwrap_or(Commands::Ui);

    match command {
        Commands::Ui => logging::init(LogTarget::File(&cli.ui_log_file())),
        _ => logging::init(LogTarget::Stderr),
    }
    tracing::debug!(db = %cli.db.display(), "supertask starting");

    let db_path = cli.db.as_path();
    match command {
        Commands::Ui => cmd_ui(db_path),
        Commands::Add { description, due } => cmd_add(db_path, description, due),
        Commands::List {
            category,
            pending,
            json,
        } => cmd_list(db_path, category, pending, json),
        Commands::Complete { id } => cmd_complete(db_path, id),
        Commands::Reopen { id } => cmd_reopen(db_path, id),
        Commands::Delete { id } => cmd_delete(db_path, id),
        Commands::Stats => cmd_stats(db_path),
        Commands::Completions { shell } => cmd_completions(shell),
    }
}
