//! # Service Layer
//!
//! [`ExpenseService`] implements the tracker's operations on top of a
//! [`Repository`]. Each operation is one load → change → save cycle;
//! read-only operations never save.

mod error;
mod query;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};

use crate::domain::validation::{
    validate_amount, validate_category, validate_currency, validate_date,
};
use crate::domain::{Expense, ExpenseId, ValidationError, DEFAULT_CURRENCY};
use crate::storage::Repository;

pub use error::TrackerError;
pub use query::{CategoryTotal, ExpenseFilter, ListQuery, SortKey, Summary};

/// Input for [`ExpenseService::add`]
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// `YYYY-MM-DD` or `today`; defaults to today
    pub date: Option<String>,
    pub category: String,
    pub amount: String,
    /// Defaults to the service's default currency
    pub currency: Option<String>,
    pub note: Option<String>,
}

/// Fields to change in [`ExpenseService::edit`]; `None` leaves a field as is
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub date: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub currency: Option<String>,
    /// An empty note clears it
    pub note: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.currency.is_none()
            && self.note.is_none()
    }
}

/// Current local time, truncated to whole seconds
pub fn local_now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Application service for expense operations.
/// This is the primary interface for any client (CLI, tests, ...).
pub struct ExpenseService<R> {
    repo: R,
    default_currency: String,
    clock: fn() -> NaiveDateTime,
}

impl<R: Repository> ExpenseService<R> {
    /// Create a new service over the given repository
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            default_currency: DEFAULT_CURRENCY.to_string(),
            clock: local_now,
        }
    }

    /// Sets the currency used when `add` is given none
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Replaces the clock used for "today" and `created_at`
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Records a new expense and returns it
    pub fn add(&self, input: NewExpense) -> Result<Expense, TrackerError> {
        tracing::info!(
            category = %input.category,
            amount = %input.amount,
            "adding expense"
        );

        let now = (self.clock)();
        let date = self.resolve_date(input.date.as_deref(), now)?;
        let amount = validate_amount(&input.amount)?;
        let category = validate_category(&input.category)?;
        let currency = match input.currency.as_deref() {
            Some(code) => validate_currency(code)?,
            None => self.default_currency.clone(),
        };

        let mut document = self.repo.load()?;
        let id = document
            .next_id(date)
            .map_err(|_| ValidationError::SequenceExhausted(date))?;

        let expense = Expense {
            id,
            date,
            category,
            amount,
            currency,
            note: normalize_note(input.note),
            created_at: now,
        };

        document.expenses.push(expense.clone());
        self.repo.save(&document)?;

        tracing::info!(id = %expense.id, "added expense");
        Ok(expense)
    }

    /// Lists expenses matching the query
    pub fn list(&self, query: &ListQuery) -> Result<Vec<Expense>, TrackerError> {
        tracing::info!(
            month = ?query.filter.month,
            category = ?query.filter.category,
            sort = ?query.sort,
            descending = query.descending,
            "listing expenses"
        );

        let criteria = query.filter.validate()?;
        let document = self.repo.load()?;

        let mut expenses: Vec<Expense> = document
            .expenses
            .into_iter()
            .filter(|e| criteria.matches(e))
            .collect();

        query::sort_expenses(&mut expenses, query.sort, query.descending);

        if let Some(limit) = query.limit.filter(|&n| n > 0) {
            expenses.truncate(limit);
        }

        tracing::info!(count = expenses.len(), "returning expenses");
        Ok(expenses)
    }

    /// Changes the given fields of an expense and returns the updated record
    pub fn edit(&self, id: &str, update: ExpenseUpdate) -> Result<Expense, TrackerError> {
        tracing::info!(id, "editing expense");

        if update.is_empty() {
            return Err(ValidationError::NothingToUpdate.into());
        }

        let id = parse_id(id)?;
        let mut document = self.repo.load()?;
        let now = (self.clock)();

        // Validate everything before touching the record
        let date = update
            .date
            .as_deref()
            .map(|d| self.resolve_date(Some(d), now))
            .transpose()?;
        let category = update.category.as_deref().map(validate_category).transpose()?;
        let amount = update.amount.as_deref().map(validate_amount).transpose()?;
        let currency = update.currency.as_deref().map(validate_currency).transpose()?;

        let expense = match document.get_mut(&id) {
            Some(expense) => expense,
            None => {
                tracing::warn!(%id, "expense not found");
                return Err(TrackerError::NotFound(id.to_string()));
            }
        };

        if let Some(date) = date {
            expense.date = date;
        }
        if let Some(category) = category {
            expense.category = category;
        }
        if let Some(amount) = amount {
            expense.amount = amount;
        }
        if let Some(currency) = currency {
            expense.currency = currency;
        }
        if let Some(note) = update.note {
            expense.note = normalize_note(Some(note));
        }

        let updated = expense.clone();
        self.repo.save(&document)?;

        tracing::info!(%id, "edited expense");
        Ok(updated)
    }

    /// Removes an expense and returns it
    pub fn delete(&self, id: &str) -> Result<Expense, TrackerError> {
        tracing::info!(id, "deleting expense");

        let id = parse_id(id)?;
        let mut document = self.repo.load()?;

        let removed = match document.remove(&id) {
            Some(expense) => expense,
            None => {
                tracing::warn!(%id, "expense not found");
                return Err(TrackerError::NotFound(id.to_string()));
            }
        };

        self.repo.save(&document)?;

        tracing::info!(%id, "deleted expense");
        Ok(removed)
    }

    /// Totals matching expenses, overall and per category
    pub fn summary(&self, filter: &ExpenseFilter) -> Result<Summary, TrackerError> {
        tracing::info!(month = ?filter.month, category = ?filter.category, "building summary");

        let criteria = filter.validate()?;
        let document = self.repo.load()?;

        let summary = Summary::build(
            filter.period(),
            &self.default_currency,
            document.expenses.iter().filter(|e| criteria.matches(e)),
        );

        tracing::info!(count = summary.count, total = %summary.total, "built summary");
        Ok(summary)
    }

    /// `None`, empty or `today` mean the clock's date
    fn resolve_date(&self, input: Option<&str>, now: NaiveDateTime) -> Result<NaiveDate, ValidationError> {
        match input.map(str::trim) {
            None | Some("") => Ok(now.date()),
            Some(s) if s.eq_ignore_ascii_case("today") => Ok(now.date()),
            Some(s) => validate_date(s),
        }
    }
}

/// A malformed ID can't exist in the document, so it is reported as not found
fn parse_id(raw: &str) -> Result<ExpenseId, TrackerError> {
    raw.parse()
        .map_err(|_| TrackerError::NotFound(raw.trim().to_string()))
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Amount;
    use crate::storage::{JsonStore, MemoryStore};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 26)
            .unwrap()
            .and_hms_opt(12, 30, 45)
            .unwrap()
    }

    fn service() -> ExpenseService<MemoryStore> {
        ExpenseService::new(MemoryStore::new()).with_clock(fixed_now)
    }

    fn new_expense(date: &str, category: &str, amount: &str) -> NewExpense {
        NewExpense {
            date: Some(date.to_string()),
            category: category.to_string(),
            amount: amount.to_string(),
            ..Default::default()
        }
    }

    /// The January scenario: transport/80, food/250.50, rent/400
    fn seed(service: &ExpenseService<MemoryStore>) -> Vec<Expense> {
        vec![
            service.add(new_expense("2026-01-25", "transport", "80")).unwrap(),
            service.add(new_expense("2026-01-26", "food", "250.50")).unwrap(),
            service.add(new_expense("2026-01-26", "rent", "400")).unwrap(),
        ]
    }

    #[test]
    fn add_defaults_date_and_currency() {
        let service = service();
        let expense = service
            .add(NewExpense {
                category: " Food ".into(),
                amount: "250.5".into(),
                note: Some("  Lunch ".into()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(expense.id.to_string(), "EXP-20260126-0001");
        assert_eq!(expense.date, fixed_now().date());
        assert_eq!(expense.category, "food");
        assert_eq!(expense.amount, Amount::from_cents(25050));
        assert_eq!(expense.currency, "BDT");
        assert_eq!(expense.note.as_deref(), Some("Lunch"));
        assert_eq!(expense.created_at, fixed_now());
        assert_eq!(service.repository().save_count(), 1);
    }

    #[test]
    fn add_accepts_today_keyword() {
        let service = service();
        let expense = service.add(new_expense("TODAY", "food", "1")).unwrap();
        assert_eq!(expense.date, fixed_now().date());
    }

    #[test]
    fn add_uses_configured_currency() {
        let service = service().with_default_currency("USD");
        let expense = service.add(new_expense("2026-01-26", "food", "1")).unwrap();
        assert_eq!(expense.currency, "USD");

        let expense = service
            .add(NewExpense {
                currency: Some("eur".into()),
                ..new_expense("2026-01-26", "food", "1")
            })
            .unwrap();
        assert_eq!(expense.currency, "EUR");
    }

    #[test]
    fn add_then_list_contains_record() {
        let service = service();
        let added = service.add(new_expense("2026-01-20", "books", "42.10")).unwrap();

        let listed = service.list(&ListQuery::default()).unwrap();
        assert_eq!(listed, vec![added]);
    }

    #[test]
    fn same_date_gets_sequential_ids() {
        let service = service();
        let first = service.add(new_expense("2026-01-26", "food", "1")).unwrap();
        service.add(new_expense("2026-01-01", "food", "1")).unwrap();
        let second = service.add(new_expense("2026-01-26", "food", "1")).unwrap();

        assert_eq!(first.id.to_string(), "EXP-20260126-0001");
        assert_eq!(second.id.to_string(), "EXP-20260126-0002");
    }

    #[test]
    fn add_rejects_invalid_fields_without_saving() {
        let service = service();

        let err = service.add(new_expense("2026-02-30", "food", "1")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::InvalidDate(_))));

        let err = service.add(new_expense("2026-01-26", "food", "-3")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::NonPositiveAmount(_))));

        let err = service.add(new_expense("2026-01-26", "food", "ten")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::InvalidAmount(_))));

        let err = service.add(new_expense("2026-01-26", "  ", "1")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::EmptyCategory)));

        assert_eq!(service.repository().save_count(), 0);
    }

    #[test]
    fn list_filters_sorts_and_limits() {
        let service = service();
        seed(&service);

        let query = ListQuery {
            sort: SortKey::Amount,
            descending: true,
            limit: Some(2),
            ..Default::default()
        };
        let listed = service.list(&query).unwrap();
        let categories: Vec<_> = listed.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["rent", "food"]);

        let query = ListQuery {
            filter: ExpenseFilter {
                category: Some("Transport".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(service.list(&query).unwrap().len(), 1);

        let query = ListQuery {
            filter: ExpenseFilter::month("2026-02"),
            ..Default::default()
        };
        assert!(service.list(&query).unwrap().is_empty());
    }

    #[test]
    fn list_limit_zero_means_unlimited() {
        let service = service();
        seed(&service);

        let query = ListQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(service.list(&query).unwrap().len(), 3);
    }

    #[test]
    fn list_never_saves() {
        let service = service();
        seed(&service);
        let saves = service.repository().save_count();

        service.list(&ListQuery::default()).unwrap();
        service.summary(&ExpenseFilter::default()).unwrap();

        assert_eq!(service.repository().save_count(), saves);
    }

    #[test]
    fn edit_changes_only_given_fields() {
        let service = service();
        let original = seed(&service).remove(1);

        let updated = service
            .edit(
                &original.id.to_string(),
                ExpenseUpdate {
                    amount: Some("300".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount, Amount::from_cents(30000));
        assert_eq!(
            Expense {
                amount: original.amount,
                ..updated.clone()
            },
            original
        );

        let stored = service.repository().snapshot();
        assert_eq!(stored.get(&original.id), Some(&updated));
        assert_eq!(stored.len(), 3);
    }

    #[test]
    fn edit_date_keeps_id() {
        let service = service();
        let original = seed(&service).remove(0);

        let updated = service
            .edit(
                &original.id.to_string(),
                ExpenseUpdate {
                    date: Some("2026-01-28".into()),
                    category: Some("Taxi".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date, NaiveDate::from_ymd_opt(2026, 1, 28).unwrap());
        assert_eq!(updated.category, "taxi");
    }

    #[test]
    fn edit_empty_note_clears_it() {
        let service = service();
        let added = service
            .add(NewExpense {
                note: Some("Lunch".into()),
                ..new_expense("2026-01-26", "food", "5")
            })
            .unwrap();

        let updated = service
            .edit(
                &added.id.to_string(),
                ExpenseUpdate {
                    note: Some(String::new()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.note, None);
    }

    #[test]
    fn edit_errors() {
        let service = service();
        seed(&service);
        let saves = service.repository().save_count();

        let err = service
            .edit("EXP-20260126-0001", ExpenseUpdate::default())
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::NothingToUpdate)));

        let update = ExpenseUpdate {
            amount: Some("5".into()),
            ..Default::default()
        };
        let err = service.edit("EXP-20990101-0001", update.clone()).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(ref id) if id == "EXP-20990101-0001"));

        let err = service.edit("garbage", update).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(ref id) if id == "garbage"));

        let err = service
            .edit(
                "EXP-20260126-0001",
                ExpenseUpdate {
                    amount: Some("0".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));

        assert_eq!(service.repository().save_count(), saves);
    }

    #[test]
    fn delete_removes_record() {
        let service = service();
        let seeded = seed(&service);
        let target = &seeded[1];

        let removed = service.delete(&target.id.to_string()).unwrap();
        assert_eq!(&removed, target);

        let listed = service.list(&ListQuery::default()).unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().all(|e| e.id != target.id));

        let err = service.delete(&target.id.to_string()).unwrap_err();
        assert!(matches!(err, TrackerError::NotFound(_)));
    }

    #[test]
    fn delete_then_add_does_not_reuse_id() {
        let service = service();
        seed(&service);

        service.delete("EXP-20260126-0001").unwrap();
        let added = service.add(new_expense("2026-01-26", "food", "1")).unwrap();
        assert_eq!(added.id.to_string(), "EXP-20260126-0003");
    }

    #[test]
    fn january_summary() {
        let service = service();
        seed(&service);

        let summary = service.summary(&ExpenseFilter::month("2026-01")).unwrap();
        assert_eq!(summary.period, "(2026-01)");
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, Amount::from_cents(73050));
        assert_eq!(summary.total.to_string(), "730.50");
        assert_eq!(summary.currency, "BDT");
        assert_eq!(summary.by_category[0].category, "rent");
        assert_eq!(summary.by_category[0].total.to_string(), "400.00");
    }

    #[test]
    fn summary_rejects_bad_month() {
        let service = service();
        let err = service.summary(&ExpenseFilter::month("2026-1")).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(ValidationError::InvalidMonth(_))));
    }

    #[test]
    fn works_against_json_store() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("expenses.json"));

        let service = ExpenseService::new(&store).with_clock(fixed_now);
        let added = service.add(new_expense("2026-01-26", "food", "250.50")).unwrap();

        // A fresh service sees the persisted record
        let service = ExpenseService::new(&store).with_clock(fixed_now);
        assert_eq!(service.list(&ListQuery::default()).unwrap(), vec![added]);
    }

    #[test]
    fn corrupt_store_surfaces_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let service = ExpenseService::new(JsonStore::new(&path));
        let err = service.list(&ListQuery::default()).unwrap_err();
        assert!(matches!(err, TrackerError::Storage(_)));
        assert_eq!(err.kind(), "storage");
    }

    fn entries() -> impl Strategy<Value = Vec<(u32, i64, &'static str)>> {
        prop::collection::vec(
            (1u32..=5, 1i64..1_000_000, prop::sample::select(vec!["food", "rent", "transport", "misc"])),
            0..25,
        )
    }

    proptest! {
        #[test]
        fn ids_are_unique(entries in entries()) {
            let service = service();
            let mut seen = HashSet::new();

            for (day, cents, category) in &entries {
                let amount = Amount::from_cents(*cents).to_string();
                let date = format!("2026-03-{:02}", day);
                let expense = service.add(new_expense(&date, category, &amount)).unwrap();
                prop_assert!(seen.insert(expense.id));
            }

            // Per date, sequences are exactly 1..=n in insertion order
            for day in 1..=5u32 {
                let date = NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
                let sequences: Vec<u16> = service
                    .repository()
                    .snapshot()
                    .expenses
                    .iter()
                    .filter(|e| e.date == date)
                    .map(|e| e.id.sequence())
                    .collect();
                let expected: Vec<u16> = (1..=sequences.len() as u16).collect();
                prop_assert_eq!(sequences, expected);
            }
        }

        #[test]
        fn summary_subtotals_sum_to_total(entries in entries()) {
            let service = service();
            for (day, cents, category) in &entries {
                let amount = Amount::from_cents(*cents).to_string();
                let date = format!("2026-03-{:02}", day);
                service.add(new_expense(&date, category, &amount)).unwrap();
            }

            let summary = service.summary(&ExpenseFilter::default()).unwrap();
            let subtotal: Amount = summary.by_category.iter().map(|c| c.total).sum();
            let expected: i64 = entries.iter().map(|(_, cents, _)| cents).sum();

            prop_assert_eq!(summary.count, entries.len());
            prop_assert_eq!(subtotal, summary.total);
            prop_assert_eq!(summary.total.cents(), expected);
            prop_assert!(summary
                .by_category
                .windows(2)
                .all(|pair| pair[0].total >= pair[1].total));
        }
    }
}
