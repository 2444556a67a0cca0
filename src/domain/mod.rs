//! Domain models for the expense tracker
//!
//! Contains the records, IDs and validation rules without any I/O concerns.

mod expense;
mod id;
mod money;
pub mod validation;

pub use expense::{Document, Expense, CURRENT_VERSION, DEFAULT_CURRENCY};
pub use id::{ExpenseId, IdError, MAX_SEQUENCE};
pub use money::Amount;
pub use validation::ValidationError;
