//! Expense Tracker - a single-user command-line expense tracker
//!
//! Expenses live in one JSON document on disk. Each command loads the
//! document, applies one change and writes it back atomically, so an
//! interrupted run never leaves a half-written file behind.

pub mod cli;
pub mod domain;
pub mod service;
pub mod storage;

pub use domain::{Amount, Document, Expense, ExpenseId};
pub use service::{ExpenseService, TrackerError};
