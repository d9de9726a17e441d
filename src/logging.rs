//! Tracing subscriber setup.
//!
//! Command-line runs log to stderr. The terminal interface owns the screen, so it
//! logs to a file instead, or nowhere if the file cannot be opened.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "supertask=info";

/// Where log output goes.
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(target: LogTarget<'_>) {
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter());
    let result = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => builder
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init(),
                Err(_) => builder.with_writer(std::io::sink).try_init(),
            }
        }
    };
    // A subscriber is already installed (tests, repeated init); keep it.
    let _ = result;
}
