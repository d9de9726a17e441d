use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-user to-do list with keyword categories and a category chart.
/// Tasks live in a SQLite file, ./todo.db unless --db says otherwise.
#[derive(Parser)]
#[command(name = "supertask", version, about = "The Ultimate To-Do List")]
pub struct Cli {
    /// Path to the SQLite database file.
    #[arg(long, global = true, default_value = "todo.db")]
    pub db: PathBuf,

    /// Log file used while the terminal UI is running.
    /// Defaults to the database path with a .log extension.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Defaults to `ui` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Log file for the terminal UI.
    ///
    /// Never the database itself: when the chosen path is the database file, `.log`
    /// is appended to its full file name instead.
    pub fn ui_log_file(&self) -> PathBuf {
        let path = self
            .log_file
            .clone()
            .unwrap_or_else(|| self.db.with_extension("log"));
        if path != self.db {
            return path;
        }
        let mut name = self.db.clone().into_os_string();
        name.push(".log");
        PathBuf::from(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["supertask"]).unwrap();
        assert_eq!(cli.db, PathBuf::from("todo.db"));
        assert!(cli.command.is_none());
        assert_eq!(cli.ui_log_file(), PathBuf::from("todo.log"));
    }

    #[test]
    fn test_default_log_file_never_overwrites_database() {
        let cli = Cli::try_parse_from(["supertask", "--db", "/tmp/tasks.log"]).unwrap();
        assert_eq!(cli.ui_log_file(), PathBuf::from("/tmp/tasks.log.log"));
        assert_ne!(cli.ui_log_file(), cli.db);

        let cli = Cli::try_parse_from(["supertask", "--db", "data/todo"]).unwrap();
        assert_eq!(cli.ui_log_file(), PathBuf::from("data/todo.log"));

        let cli = Cli::try_parse_from(["supertask", "--db", "a.db", "--log-file", "a.db"]).unwrap();
        assert_eq!(cli.ui_log_file(), PathBuf::from("a.db.log"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "supertask", "list", "--pending", "--db", "/tmp/x.db", "--log-file", "/tmp/st.log",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("/tmp/x.db"));
        assert_eq!(cli.ui_log_file(), PathBuf::from("/tmp/st.log"));
        assert!(matches!(cli.command, Some(Commands::List { pending: true, .. })));
    }

    #[test]
    fn test_add_arguments() {
        let cli = Cli::try_parse_from(["supertask", "add", "Work meeting", "--due", "friday"])
            .unwrap();
        match cli.command {
            Some(Commands::Add { description, due }) => {
                assert_eq!(description, "Work meeting");
                assert_eq!(due.as_deref(), Some("friday"));
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["supertask", "list", "--category", "chores"]).is_err());
    }
}
