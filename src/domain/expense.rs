//! Expense domain model
//!
//! An expense is one tracked transaction. The [`Document`] is the whole
//! persisted collection plus its schema version.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::id::{ExpenseId, IdError};
use super::money::Amount;

/// Schema version written by this build
pub const CURRENT_VERSION: u32 = 1;

/// Currency used when none is given
pub const DEFAULT_CURRENCY: &str = "BDT";

/// A single expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Calendar date the money was spent
    pub date: NaiveDate,

    /// Lowercased, trimmed category (e.g. `food`, `transport`)
    pub category: String,

    pub amount: Amount,

    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Local time the record was created
    #[serde(with = "timestamp")]
    pub created_at: NaiveDateTime,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Expense {
    /// Returns the note, or an empty string when there is none
    pub fn note_or_empty(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }

    /// Returns `YYYY-MM` for the expense date
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} {} | {}",
            self.id,
            self.date,
            self.category,
            self.amount,
            self.currency,
            self.note_or_empty()
        )
    }
}

/// The persisted document: schema version plus expenses in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub version: u32,
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            expenses: Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &ExpenseId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|e| &e.id == id)
    }

    /// Removes an expense by ID, preserving the order of the rest
    pub fn remove(&mut self, id: &ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| &e.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// Computes the ID for the next expense dated `date`.
    ///
    /// The sequence is the number of expenses already dated that day plus one.
    /// If that ID is taken (after a delete or a date edit) the sequence moves
    /// past the highest one used for the date instead.
    pub fn next_id(&self, date: NaiveDate) -> Result<ExpenseId, IdError> {
        let same_day = self.expenses.iter().filter(|e| e.date == date).count();
        let used: Vec<u16> = self
            .expenses
            .iter()
            .filter(|e| e.id.date() == date)
            .map(|e| e.id.sequence())
            .collect();

        let candidate = same_day + 1;
        let sequence = if used.iter().any(|&seq| usize::from(seq) == candidate) {
            used.iter().copied().max().map_or(1, usize::from) + 1
        } else {
            candidate
        };

        let sequence =
            u16::try_from(sequence).map_err(|_| IdError::InvalidSequence(sequence.to_string()))?;
        ExpenseId::new(date, sequence)
    }
}

/// `created_at` is written as `YYYY-MM-DDTHH:MM:SS`; a space separator is
/// accepted on read as well.
mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
    }
}
