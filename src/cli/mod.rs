//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose | Example |
//! |---------|---------|---------|
//! | `add` | Record an expense | `tracker add --category food --amount 250.50` |
//! | `list` | Filter, sort and print expenses | `tracker list --month 2026-01 --sort amount --desc` |
//! | `edit` | Change fields of one expense | `tracker edit --id EXP-20260126-0001 --note Dinner` |
//! | `delete` | Remove one expense | `tracker delete --id EXP-20260126-0001` |
//! | `summary` | Totals per category | `tracker summary --month 2026-01` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! `list --csv` prints CSV in text mode.
//!
//! ## Logging
//!
//! Every invocation appends to the log file (`logs/tracker.log` by default).
//! Use `--verbose` (or `-v`) to log at debug level, or set `TRACKER_LOG`:
//! ```bash
//! TRACKER_LOG=expense_tracker=trace tracker list
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod expense;
mod logging;
mod output;

pub use app::{run, Cli, Commands};
pub use expense::{render_summary, render_table, write_csv};
pub use logging::{file_subscriber, LOG_ENV};
pub use output::{Output, OutputFormat};
