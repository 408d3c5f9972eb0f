//! Report aggregation for Kakeibo
//!
//! Monthly and yearly summaries of expenses grouped by category and card,
//! including the shared-expense split between the two household members.

pub mod monthly;
pub mod yearly;

pub use monthly::MonthlyReport;
pub use yearly::YearlyReport;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{KakeiboError, KakeiboResult};
use crate::models::{CardId, CategoryId, Expense, Money};
use crate::storage::Storage;

/// Which expenses a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFilter {
    pub year: i32,
    /// Required by the monthly report, ignored by the yearly one
    pub month: Option<u32>,
    /// Restrict the report to a single card
    pub card_id: Option<CardId>,
}

impl ReportFilter {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            card_id: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
            card_id: None,
        }
    }

    pub fn for_card(mut self, card_id: CardId) -> Self {
        self.card_id = Some(card_id);
        self
    }
}

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryExpenseSum {
    pub category_id: CategoryId,
    pub category_name: String,
    pub color: String,
    pub is_shared: bool,
    pub total_amount: Money,
    pub count: usize,
    /// Share of the report total, one decimal place
    pub percentage: f64,
}

/// Spending on one card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardExpenseSum {
    pub card_id: CardId,
    pub card_name: String,
    pub color: String,
    pub total_amount: Money,
    pub count: usize,
    pub percentage: f64,
}

/// Spending in shared categories and each member's half of it
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedExpensesSummary {
    pub total_shared_amount: Money,
    pub split_amount: Money,
    pub categories: Vec<CategoryExpenseSum>,
}

impl SharedExpensesSummary {
    /// Build the summary from the shared subset of a category breakdown
    pub fn from_categories(by_category: &[CategoryExpenseSum]) -> Self {
        let categories: Vec<_> = by_category.iter().filter(|c| c.is_shared).cloned().collect();
        let total_shared_amount: Money = categories.iter().map(|c| c.total_amount).sum();

        Self {
            split_amount: total_shared_amount.half(),
            total_shared_amount,
            categories,
        }
    }
}

/// Spending in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpenseSum {
    pub year: i32,
    pub month: u32,
    pub total_amount: Money,
    pub count: usize,
}

/// First and last day of a month
pub(crate) fn month_bounds(year: i32, month: u32) -> KakeiboResult<(NaiveDate, NaiveDate)> {
    let invalid = || KakeiboError::Validation(format!("Invalid report period: {}-{:02}", year, month));

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let end = next.and_then(|d| d.pred_opt()).ok_or_else(invalid)?;
    Ok((start, end))
}

/// Expenses in `start..=end`, optionally for one card
pub(crate) fn load_expenses(
    storage: &Storage,
    start: NaiveDate,
    end: NaiveDate,
    card_id: Option<CardId>,
) -> KakeiboResult<Vec<Expense>> {
    let expenses = storage.expenses.get_by_date_range(start, end)?;
    Ok(match card_id {
        Some(id) => expenses.into_iter().filter(|e| e.card_id == id).collect(),
        None => expenses,
    })
}

/// Largest total first, then by name
fn by_total_then_name<'a>(a: (Money, &'a str), b: (Money, &'a str)) -> std::cmp::Ordering {
    b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1))
}

/// Group expenses by category
///
/// Expenses whose category no longer exists are left out of the breakdown.
pub(crate) fn group_by_category(
    storage: &Storage,
    expenses: &[Expense],
    total: Money,
) -> KakeiboResult<Vec<CategoryExpenseSum>> {
    let mut sums: HashMap<CategoryId, (Money, usize)> = HashMap::new();
    for expense in expenses {
        let entry = sums.entry(expense.category_id).or_insert((Money::zero(), 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut groups = Vec::with_capacity(sums.len());
    for (category_id, (total_amount, count)) in sums {
        let Some(category) = storage.categories.get(category_id)? else {
            continue;
        };
        groups.push(CategoryExpenseSum {
            category_id,
            category_name: category.name,
            color: category.color,
            is_shared: category.is_shared,
            total_amount,
            count,
            percentage: total_amount.percent_of(total),
        });
    }

    groups.sort_by(|a, b| {
        by_total_then_name(
            (a.total_amount, a.category_name.as_str()),
            (b.total_amount, b.category_name.as_str()),
        )
    });
    Ok(groups)
}

/// Group expenses by card
pub(crate) fn group_by_card(
    storage: &Storage,
    expenses: &[Expense],
    total: Money,
) -> KakeiboResult<Vec<CardExpenseSum>> {
    let mut sums: HashMap<CardId, (Money, usize)> = HashMap::new();
    for expense in expenses {
        let entry = sums.entry(expense.card_id).or_insert((Money::zero(), 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut groups = Vec::with_capacity(sums.len());
    for (card_id, (total_amount, count)) in sums {
        let Some(card) = storage.cards.get(card_id)? else {
            continue;
        };
        groups.push(CardExpenseSum {
            card_id,
            card_name: card.name,
            color: card.color,
            total_amount,
            count,
            percentage: total_amount.percent_of(total),
        });
    }

    groups.sort_by(|a, b| {
        by_total_then_name(
            (a.total_amount, a.card_name.as_str()),
            (b.total_amount, b.card_name.as_str()),
        )
    });
    Ok(groups)
}

/// Per-month totals, ascending, only months that have expenses
pub(crate) fn group_by_month(expenses: &[Expense]) -> Vec<MonthlyExpenseSum> {
    let mut sums: HashMap<(i32, u32), (Money, usize)> = HashMap::new();
    for expense in expenses {
        let key = (expense.date.year(), expense.date.month());
        let entry = sums.entry(key).or_insert((Money::zero(), 0));
        entry.0 += expense.amount;
        entry.1 += 1;
    }

    let mut months: Vec<_> = sums
        .into_iter()
        .map(|((year, month), (total_amount, count))| MonthlyExpenseSum {
            year,
            month,
            total_amount,
            count,
        })
        .collect();
    months.sort_by_key(|m| (m.year, m.month));
    months
}

fn export_err(e: impl std::fmt::Display) -> KakeiboError {
    KakeiboError::Export(e.to_string())
}

/// Shared CSV layout: one row per breakdown line
pub(crate) fn write_breakdown_csv<W: std::io::Write>(
    writer: W,
    period: &str,
    total: Money,
    total_count: usize,
    by_category: &[CategoryExpenseSum],
    by_card: &[CardExpenseSum],
    shared: &SharedExpensesSummary,
) -> KakeiboResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["Period", "Section", "Name", "Shared", "Amount", "Count", "Percentage"])?;

    let amount = |m: Money| format!("{:.2}", m.as_f64());

    for c in by_category {
        let row: [&str; 7] = [
            period,
            "category",
            &c.category_name,
            if c.is_shared { "yes" } else { "no" },
            &amount(c.total_amount),
            &c.count.to_string(),
            &format!("{:.1}", c.percentage),
        ];
        wtr.write_record(row)?;
    }
    for c in by_card {
        let row: [&str; 7] = [
            period,
            "card",
            &c.card_name,
            "",
            &amount(c.total_amount),
            &c.count.to_string(),
            &format!("{:.1}", c.percentage),
        ];
        wtr.write_record(row)?;
    }

    let split = amount(shared.split_amount);
    wtr.write_record([period, "shared", "Split per person", "yes", split.as_str(), "", ""])?;

    let total = amount(total);
    let count = total_count.to_string();
    wtr.write_record([period, "total", "TOTAL", "", total.as_str(), count.as_str(), "100.0"])?;

    wtr.flush().map_err(export_err)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::paths::KakeiboPaths;
    use crate::models::{Card, Category};
    use tempfile::TempDir;

    pub fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KakeiboPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    pub fn add_card(storage: &Storage, name: &str) -> Card {
        let card = Card::new(name, "#3B82F6");
        storage.cards.upsert(card.clone()).unwrap();
        card
    }

    pub fn add_category(storage: &Storage, name: &str, shared: bool) -> Category {
        let mut category = Category::new(name, "#10B981");
        category.is_shared = shared;
        storage.categories.upsert(category.clone()).unwrap();
        category
    }

    pub fn add_expense(
        storage: &Storage,
        card: &Card,
        category: &Category,
        minor_units: i64,
        date: (i32, u32, u32),
    ) {
        let expense = Expense::new(
            Money::from_minor_units(minor_units),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            card.id,
            category.id,
        );
        storage.expenses.upsert(expense).unwrap();
    }
}
