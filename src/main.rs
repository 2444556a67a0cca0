//! Expense Tracker CLI - record and summarize personal spending

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = expense_tracker::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
