//! Filtering, sorting and aggregation over expenses

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::validation::{
    validate_amount_bound, validate_category, validate_date, validate_month,
};
use crate::domain::{Amount, Expense, ValidationError};

/// Field to sort listings by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Category,
}

/// Raw filter input, validated when a query runs
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// `YYYY-MM`
    pub month: Option<String>,
    /// Inclusive lower date bound, `YYYY-MM-DD`
    pub from: Option<String>,
    /// Inclusive upper date bound, `YYYY-MM-DD`
    pub to: Option<String>,
    pub category: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

/// Options for listing expenses
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: ExpenseFilter,
    pub sort: SortKey,
    pub descending: bool,
    /// Maximum rows to return; `0` means no limit
    pub limit: Option<usize>,
}

/// Validated form of [`ExpenseFilter`]
#[derive(Debug, Default)]
pub(crate) struct Criteria {
    month: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    category: Option<String>,
    min_amount: Option<Amount>,
    max_amount: Option<Amount>,
}

impl ExpenseFilter {
    /// Filter on a single month
    pub fn month(month: impl Into<String>) -> Self {
        Self {
            month: Some(month.into()),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<Criteria, ValidationError> {
        Ok(Criteria {
            month: self.month.as_deref().map(validate_month).transpose()?,
            from: self.from.as_deref().map(validate_date).transpose()?,
            to: self.to.as_deref().map(validate_date).transpose()?,
            category: self.category.as_deref().map(validate_category).transpose()?,
            min_amount: self.min_amount.as_deref().map(validate_amount_bound).transpose()?,
            max_amount: self.max_amount.as_deref().map(validate_amount_bound).transpose()?,
        })
    }

    /// Human-readable description of the covered period
    pub fn period(&self) -> String {
        match (&self.month, &self.from, &self.to) {
            (Some(month), _, _) => format!("({})", month.trim()),
            (None, Some(from), Some(to)) => format!("({} to {})", from.trim(), to.trim()),
            (None, Some(from), None) => format!("(from {})", from.trim()),
            (None, None, Some(to)) => format!("(to {})", to.trim()),
            (None, None, None) => "(all time)".to_string(),
        }
    }
}

impl Criteria {
    pub(crate) fn matches(&self, expense: &Expense) -> bool {
        if let Some(month) = &self.month {
            if !expense.date.to_string().starts_with(month.as_str()) {
                return false;
            }
        }
        if self.from.is_some_and(|from| expense.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| expense.date > to) {
            return false;
        }
        if let Some(category) = &self.category {
            if &expense.category != category {
                return false;
            }
        }
        if self.min_amount.is_some_and(|min| expense.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| expense.amount > max) {
            return false;
        }
        true
    }
}

/// Stable sort, so equal keys keep insertion order in either direction
pub(crate) fn sort_expenses(expenses: &mut [Expense], key: SortKey, descending: bool) {
    expenses.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::Category => a.category.cmp(&b.category),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub count: usize,
    pub total: Amount,
}

/// Aggregate over a filtered set of expenses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub period: String,
    pub count: usize,
    pub total: Amount,
    pub currency: String,
    /// Sorted by descending total, ties by category name
    pub by_category: Vec<CategoryTotal>,
}

impl Summary {
    pub(crate) fn build<'a>(
        period: String,
        default_currency: &str,
        expenses: impl IntoIterator<Item = &'a Expense>,
    ) -> Self {
        let mut count = 0;
        let mut total = Amount::ZERO;
        let mut currency = None;
        let mut categories: BTreeMap<&str, (usize, Amount)> = BTreeMap::new();

        for expense in expenses {
            count += 1;
            total += expense.amount;
            currency.get_or_insert(expense.currency.as_str());

            let entry = categories
                .entry(expense.category.as_str())
                .or_insert((0, Amount::ZERO));
            entry.0 += 1;
            entry.1 += expense.amount;
        }

        let mut by_category: Vec<CategoryTotal> = categories
            .into_iter()
            .map(|(category, (count, total))| CategoryTotal {
                category: category.to_string(),
                count,
                total,
            })
            .collect();
        by_category.sort_by(|a, b| b.total.cmp(&a.total));

        Self {
            period,
            count,
            total,
            currency: currency.unwrap_or(default_currency).to_string(),
            by_category,
        }
    }
}
