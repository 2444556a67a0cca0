//! Expense CLI commands

use std::io;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};

use super::output::Output;
use crate::domain::Expense;
use crate::service::{
    ExpenseFilter, ExpenseService, ExpenseUpdate, ListQuery, NewExpense, SortKey, Summary,
};
use crate::storage::Repository;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Category (e.g., food, transport)
    #[arg(long)]
    pub category: String,

    /// Amount spent
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// Currency code (default: from config, BDT)
    #[arg(long)]
    pub currency: Option<String>,

    /// Optional note
    #[arg(long)]
    pub note: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Filter by month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,

    /// From date, inclusive (YYYY-MM-DD)
    #[arg(long = "from")]
    pub from_date: Option<String>,

    /// To date, inclusive (YYYY-MM-DD)
    #[arg(long = "to")]
    pub to_date: Option<String>,

    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,
}

impl FilterArgs {
    fn into_filter(self) -> ExpenseFilter {
        ExpenseFilter {
            month: self.month,
            from: self.from_date,
            to: self.to_date,
            category: self.category,
            ..Default::default()
        }
    }
}

/// `--sort` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortField {
    Date,
    Amount,
    Category,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Date => SortKey::Date,
            SortField::Amount => SortKey::Amount,
            SortField::Category => SortKey::Category,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Minimum amount
    #[arg(long)]
    pub min: Option<String>,

    /// Maximum amount
    #[arg(long)]
    pub max: Option<String>,

    /// Sort by field
    #[arg(long, value_enum, default_value = "date")]
    pub sort: SortField,

    /// Sort in descending order
    #[arg(long)]
    pub desc: bool,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Print CSV instead of a table
    #[arg(long)]
    pub csv: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Expense ID to edit
    #[arg(long)]
    pub id: String,

    /// New date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,

    /// New category
    #[arg(long)]
    pub category: Option<String>,

    /// New amount
    #[arg(long, allow_hyphen_values = true)]
    pub amount: Option<String>,

    /// New currency
    #[arg(long)]
    pub currency: Option<String>,

    /// New note (empty to clear)
    #[arg(long)]
    pub note: Option<String>,
}

pub fn add<R: Repository>(service: &ExpenseService<R>, output: &Output, args: AddArgs) -> Result<()> {
    let expense = service.add(NewExpense {
        date: args.date,
        category: args.category,
        amount: args.amount,
        currency: args.currency,
        note: args.note,
    })?;

    if output.is_json() {
        output.data(&expense)?;
    } else {
        output.success(&format!("Added: {}", expense));
    }
    Ok(())
}

pub fn list<R: Repository>(service: &ExpenseService<R>, output: &Output, args: ListArgs) -> Result<()> {
    if args.csv && output.is_json() {
        bail!("--csv cannot be combined with --format json");
    }

    let query = ListQuery {
        filter: ExpenseFilter {
            min_amount: args.min,
            max_amount: args.max,
            ..args.filter.into_filter()
        },
        sort: args.sort.into(),
        descending: args.desc,
        limit: args.limit,
    };

    let expenses = service.list(&query)?;

    if output.is_json() {
        output.data(&expenses)
    } else if expenses.is_empty() {
        output.text("No expenses found.")
    } else if args.csv {
        write_csv(io::stdout().lock(), &expenses)
    } else {
        output.text(&render_table(&expenses))
    }
}

pub fn edit<R: Repository>(service: &ExpenseService<R>, output: &Output, args: EditArgs) -> Result<()> {
    let expense = service.edit(
        &args.id,
        ExpenseUpdate {
            date: args.date,
            category: args.category,
            amount: args.amount,
            currency: args.currency,
            note: args.note,
        },
    )?;

    if output.is_json() {
        output.data(&expense)?;
    } else {
        output.success(&format!("Updated: {}", expense));
    }
    Ok(())
}

pub fn delete<R: Repository>(service: &ExpenseService<R>, output: &Output, id: &str) -> Result<()> {
    let removed = service.delete(id)?;

    if output.is_json() {
        output.data(&removed)?;
    } else {
        output.success(&format!("Deleted: {}", removed.id));
    }
    Ok(())
}

pub fn summary<R: Repository>(
    service: &ExpenseService<R>,
    output: &Output,
    args: FilterArgs,
) -> Result<()> {
    let summary = service.summary(&args.into_filter())?;

    if output.is_json() {
        output.data(&summary)
    } else {
        output.text(&render_summary(&summary))
    }
}

/// Renders expenses as an aligned table
pub fn render_table(expenses: &[Expense]) -> String {
    let headers = ["ID", "Date", "Category", "Amount", "Note"];

    let rows: Vec<[String; 5]> = expenses
        .iter()
        .map(|e| {
            [
                e.id.to_string(),
                e.date.to_string(),
                e.category.clone(),
                format!("{} {}", e.amount, e.currency),
                e.note_or_empty().to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header = format_row(&headers);
    let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));

    let mut lines = vec![header, rule];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells));
    }
    lines.join("\n")
}

/// Renders a summary block
pub fn render_summary(summary: &Summary) -> String {
    let mut lines = vec![
        format!("Summary {}", summary.period),
        format!("Total expenses: {}", summary.count),
        format!("Grand total: {} {}", summary.total, summary.currency),
    ];

    if !summary.by_category.is_empty() {
        let name_width = summary
            .by_category
            .iter()
            .map(|c| c.category.chars().count())
            .max()
            .unwrap_or(0);

        lines.push(String::new());
        lines.push("By category:".to_string());
        for category in &summary.by_category {
            lines.push(format!(
                "  {:<name_width$}  {:>10} {}",
                category.category,
                category.total,
                summary.currency,
                name_width = name_width
            ));
        }
    }

    lines.join("\n")
}

/// Writes expenses as CSV with a header row
pub fn write_csv<W: io::Write>(writer: W, expenses: &[Expense]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["ID", "Date", "Category", "Amount", "Currency", "Note"])?;
    for expense in expenses {
        csv_writer.write_record([
            expense.id.to_string(),
            expense.date.to_string(),
            expense.category.clone(),
            expense.amount.to_string(),
            expense.currency.clone(),
            expense.note_or_empty().to_string(),
        ])?;
    }

    csv_writer.flush().context("Failed to write CSV")?;
    Ok(())
}
