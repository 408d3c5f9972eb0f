//! Yearly Report
//!
//! A calendar year of spending: per-month totals plus the same category, card
//! and shared-split breakdowns as the monthly report.

use std::io::Write;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{KakeiboError, KakeiboResult};
use crate::models::Money;
use crate::storage::Storage;

use super::{
    group_by_card, group_by_category, group_by_month, load_expenses, write_breakdown_csv,
    CardExpenseSum, CategoryExpenseSum, MonthlyExpenseSum, ReportFilter, SharedExpensesSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub year: i32,
    pub total_amount: Money,
    pub total_count: usize,
    /// Total spread over twelve months
    pub monthly_average: Money,
    /// Only months that have expenses, in calendar order
    pub monthly_data: Vec<MonthlyExpenseSum>,
    pub shared_expenses: SharedExpensesSummary,
    pub by_category: Vec<CategoryExpenseSum>,
    /// Empty when the report is restricted to one card
    pub by_card: Vec<CardExpenseSum>,
}

impl YearlyReport {
    /// Generate the report for `filter.year`; `filter.month` is ignored
    pub fn generate(storage: &Storage, filter: &ReportFilter) -> KakeiboResult<Self> {
        let year = filter.year;
        let invalid = || KakeiboError::Validation(format!("Invalid report year: {}", year));
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(invalid)?;

        let expenses = load_expenses(storage, start, end, filter.card_id)?;
        let total_amount: Money = expenses.iter().map(|e| e.amount).sum();

        let by_category = group_by_category(storage, &expenses, total_amount)?;
        let shared_expenses = SharedExpensesSummary::from_categories(&by_category);
        let by_card = if filter.card_id.is_some() {
            Vec::new()
        } else {
            group_by_card(storage, &expenses, total_amount)?
        };

        Ok(Self {
            year,
            total_amount,
            total_count: expenses.len(),
            monthly_average: total_amount.divide(12),
            monthly_data: group_by_month(&expenses),
            shared_expenses,
            by_category,
            by_card,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let mut output = String::new();

        output.push_str(&format!("Yearly Report: {}\n", self.year));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!("Total Spending: {}\n", money(self.total_amount)));
        output.push_str(&format!("Monthly Average: {}\n", money(self.monthly_average)));
        output.push_str(&format!("Expenses: {}\n\n", self.total_count));

        if self.monthly_data.is_empty() {
            output.push_str("No expenses recorded for this year.\n");
            return output;
        }

        output.push_str(&format!("{:<10} {:>14} {:>6}\n", "Month", "Amount", "Count"));
        output.push_str(&"-".repeat(32));
        output.push('\n');
        for m in &self.monthly_data {
            output.push_str(&format!(
                "{:<10} {:>14} {:>6}\n",
                format!("{}-{:02}", m.year, m.month),
                money(m.total_amount),
                m.count
            ));
        }

        output.push_str(&format!(
            "\n{:<32} {:>14} {:>6} {:>7}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(64));
        output.push('\n');
        for c in &self.by_category {
            let name = if c.is_shared {
                format!("{} *", c.category_name)
            } else {
                c.category_name.clone()
            };
            output.push_str(&format!(
                "{:<32} {:>14} {:>6} {:>6.1}%\n",
                name,
                money(c.total_amount),
                c.count,
                c.percentage
            ));
        }

        if !self.by_card.is_empty() {
            output.push_str(&format!(
                "\n{:<32} {:>14} {:>6} {:>7}\n",
                "Card", "Amount", "Count", "%"
            ));
            output.push_str(&"-".repeat(64));
            output.push('\n');
            for c in &self.by_card {
                output.push_str(&format!(
                    "{:<32} {:>14} {:>6} {:>6.1}%\n",
                    c.card_name,
                    money(c.total_amount),
                    c.count,
                    c.percentage
                ));
            }
        }

        output.push('\n');
        output.push_str(&format!(
            "Shared (*): {}  /  per person: {}\n",
            money(self.shared_expenses.total_shared_amount),
            money(self.shared_expenses.split_amount)
        ));

        output
    }

    /// Export the report to CSV format
    ///
    /// Month rows come first, followed by the category and card breakdowns.
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> KakeiboResult<()> {
        {
            let mut wtr = csv::Writer::from_writer(&mut *writer);
            wtr.write_record(["Month", "Amount", "Count"])?;
            for m in &self.monthly_data {
                wtr.write_record([
                    format!("{}-{:02}", m.year, m.month),
                    format!("{:.2}", m.total_amount.as_f64()),
                    m.count.to_string(),
                ])?;
            }
            wtr.flush()
                .map_err(|e| KakeiboError::Export(e.to_string()))?;
        }
        writeln!(writer).map_err(|e| KakeiboError::Export(e.to_string()))?;

        write_breakdown_csv(
            writer,
            &self.year.to_string(),
            self.total_amount,
            self.total_count,
            &self.by_category,
            &self.by_card,
            &self.shared_expenses,
        )
    }
}
