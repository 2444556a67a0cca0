use thiserror::Error;

use crate::domain::ValidationError;
use crate::storage::StorageError;

/// Errors returned by [`ExpenseService`](super::ExpenseService) operations
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("expense not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TrackerError {
    /// Short label for the error class, used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            TrackerError::Validation(_) => "validation",
            TrackerError::NotFound(_) => "not_found",
            TrackerError::Storage(_) => "storage",
        }
    }
}
