//! Log file setup
//!
//! Each invocation appends plain-text lines to the log file:
//!
//! ```text
//! 2026-01-26T06:30:45.123456Z  INFO expense_tracker::service: added expense id=EXP-20260126-0001
//! ```
//!
//! The subscriber is handed back to the caller, who scopes it to the command
//! with [`tracing::subscriber::with_default`].

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive that overrides config
pub const LOG_ENV: &str = "TRACKER_LOG";

/// Builds a subscriber writing to `path` at `directive` (e.g. `info`).
///
/// `TRACKER_LOG`, when set and valid, takes precedence over `directive`.
pub fn file_subscriber(
    path: &Path,
    directive: &str,
) -> Result<impl tracing::Subscriber + Send + Sync + 'static> {
    let file = open_append(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level: {}", directive))?,
    };

    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish())
}

/// Opens a file for appending, creating it and its parent directories
fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
