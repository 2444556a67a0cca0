//! Expense ID system
//!
//! ID Format: `EXP-{YYYYMMDD}-{NNNN}` (e.g., `EXP-20260126-0001`)
//!
//! The date part is the expense date at creation time, the sequence is the
//! position of the expense among those recorded for that date (1-based,
//! zero-padded to four digits).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Prefix shared by every expense ID
const PREFIX: &str = "EXP-";

/// Largest sequence that still fits in four digits
pub const MAX_SEQUENCE: u16 = 9999;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid expense ID format: expected 'EXP-YYYYMMDD-NNNN', got '{0}'")]
    InvalidFormat(String),

    #[error("Invalid date in expense ID: '{0}'")]
    InvalidDate(String),

    #[error("Invalid sequence number: {0}")]
    InvalidSequence(String),
}

/// Expense ID in the format `EXP-YYYYMMDD-NNNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExpenseId {
    date: NaiveDate,
    sequence: u16,
}

impl ExpenseId {
    /// Creates an ID for the given date and sequence.
    ///
    /// Returns an error if the sequence is outside `1..=9999`.
    pub fn new(date: NaiveDate, sequence: u16) -> Result<Self, IdError> {
        if sequence == 0 || sequence > MAX_SEQUENCE {
            return Err(IdError::InvalidSequence(sequence.to_string()));
        }
        Ok(Self { date, sequence })
    }

    /// Returns the date encoded in the ID
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the per-date sequence number
    pub fn sequence(&self) -> u16 {
        self.sequence
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}-{:04}",
            PREFIX,
            self.date.format("%Y%m%d"),
            self.sequence
        )
    }
}

impl FromStr for ExpenseId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let rest = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| IdError::InvalidFormat(s.to_string()))?;

        let (date_part, seq_part) = rest
            .split_once('-')
            .ok_or_else(|| IdError::InvalidFormat(s.to_string()))?;

        if date_part.len() != 8 || !date_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdError::InvalidFormat(s.to_string()));
        }
        if seq_part.len() != 4 || !seq_part.chars().all(|c| c.is_ascii_digit()) {
            return Err(IdError::InvalidFormat(s.to_string()));
        }

        let date = NaiveDate::parse_from_str(date_part, "%Y%m%d")
            .map_err(|_| IdError::InvalidDate(date_part.to_string()))?;
        let sequence: u16 = seq_part
            .parse()
            .map_err(|_| IdError::InvalidSequence(seq_part.to_string()))?;

        Self::new(date, sequence)
    }
}

impl TryFrom<String> for ExpenseId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ExpenseId> for String {
    fn from(id: ExpenseId) -> Self {
        id.to_string()
    }
}
