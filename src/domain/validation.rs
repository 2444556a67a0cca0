//! Field-level input validation
//!
//! Each check takes raw user text and returns the normalized value or a
//! [`ValidationError`] that can be shown to the user as-is.

use chrono::NaiveDate;
use thiserror::Error;

use super::money::Amount;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("date must be a valid calendar date in YYYY-MM-DD format, got '{0}'")]
    InvalidDate(String),

    #[error("month must be in YYYY-MM format, got '{0}'")]
    InvalidMonth(String),

    #[error("amount must be a valid number, got '{0}'")]
    InvalidAmount(String),

    #[error("amount must be > 0, got '{0}'")]
    NonPositiveAmount(String),

    #[error("amount filter must not be negative, got '{0}'")]
    NegativeBound(String),

    #[error("category cannot be empty")]
    EmptyCategory,

    #[error("currency must be a short alphabetic code (e.g. BDT), got '{0}'")]
    InvalidCurrency(String),

    #[error("at least one field must be provided to edit")]
    NothingToUpdate,

    #[error("too many expenses recorded for {0}")]
    SequenceExhausted(NaiveDate),
}

/// Validates a `YYYY-MM-DD` calendar date
pub fn validate_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    // chrono also takes signed years and space-padded fields
    let well_formed = trimmed.len() == 10
        && trimmed.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(ValidationError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Validates a `YYYY-MM` month, returning it trimmed
pub fn validate_month(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidMonth(input.to_string());

    let (year, month) = trimmed.split_once('-').ok_or_else(invalid)?;
    if year.len() != 4 || month.len() != 2 {
        return Err(invalid());
    }
    if !year.chars().chain(month.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let month_num: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month_num) {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

/// Validates a positive decimal amount, rounded to cents
pub fn validate_amount(input: &str) -> Result<Amount, ValidationError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(input.to_string()))?;

    let amount =
        Amount::from_f64(value).ok_or_else(|| ValidationError::InvalidAmount(input.to_string()))?;

    if !amount.is_positive() {
        return Err(ValidationError::NonPositiveAmount(input.to_string()));
    }
    Ok(amount)
}

/// Validates a filter bound: numeric and not negative (zero allowed)
pub fn validate_amount_bound(input: &str) -> Result<Amount, ValidationError> {
    let amount = input
        .trim()
        .parse::<f64>()
        .ok()
        .and_then(Amount::from_f64)
        .ok_or_else(|| ValidationError::InvalidAmount(input.to_string()))?;

    if amount < Amount::ZERO {
        return Err(ValidationError::NegativeBound(input.to_string()));
    }
    Ok(amount)
}

/// Validates a non-empty category, returning it trimmed and lowercased
pub fn validate_category(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    Ok(trimmed.to_lowercase())
}

/// Validates a currency code, returning it uppercased
pub fn validate_currency(input: &str) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() || trimmed.len() > 8 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidCurrency(input.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
