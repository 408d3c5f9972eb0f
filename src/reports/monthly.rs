//! Monthly Report
//!
//! Spending for one calendar month broken down by category and card, with the
//! shared-expense split.

use std::io::Write;

use serde::Serialize;

use crate::error::{KakeiboError, KakeiboResult};
use crate::models::Money;
use crate::storage::Storage;

use super::{
    group_by_card, group_by_category, load_expenses, month_bounds, write_breakdown_csv,
    CardExpenseSum, CategoryExpenseSum, ReportFilter, SharedExpensesSummary,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub total_amount: Money,
    pub total_count: usize,
    pub shared_expenses: SharedExpensesSummary,
    pub by_category: Vec<CategoryExpenseSum>,
    /// Empty when the report is restricted to one card
    pub by_card: Vec<CardExpenseSum>,
}

impl MonthlyReport {
    /// Generate the report for `filter.year` / `filter.month`
    pub fn generate(storage: &Storage, filter: &ReportFilter) -> KakeiboResult<Self> {
        let month = filter.month.ok_or_else(|| {
            KakeiboError::Validation("Month is required for a monthly report".into())
        })?;
        let (start, end) = month_bounds(filter.year, month)?;

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
            year: filter.year,
            month,
            total_amount,
            total_count: expenses.len(),
            shared_expenses,
            by_category,
            by_card,
        })
    }

    fn period(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency_symbol);
        let mut output = String::new();

        output.push_str(&format!("Monthly Report: {}\n", self.period()));
        output.push_str(&"=".repeat(64));
        output.push('\n');
        output.push_str(&format!("Total Spending: {}\n", money(self.total_amount)));
        output.push_str(&format!("Expenses: {}\n\n", self.total_count));

        if self.by_category.is_empty() {
            output.push_str("No expenses recorded for this month.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<32} {:>14} {:>6} {:>7}\n",
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
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> KakeiboResult<()> {
        write_breakdown_csv(
            writer,
            &self.period(),
            self.total_amount,
            self.total_count,
            &self.by_category,
            &self.by_card,
            &self.shared_expenses,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::*;

    #[test]
    fn test_generate_monthly_report() {
        let (_temp_dir, storage) = create_test_storage();
        let visa = add_card(&storage, "Visa");
        let cash = add_card(&storage, "Cash");
        let rent = add_category(&storage, "Rent", true);
        let food = add_category(&storage, "Food", false);

        add_expense(&storage, &visa, &rent, 8_000_000, (2024, 3, 1));
        add_expense(&storage, &visa, &food, 1_500_000, (2024, 3, 10));
        add_expense(&storage, &cash, &food, 500_000, (2024, 3, 31));
        // Outside the month
        add_expense(&storage, &cash, &food, 999_900, (2024, 4, 1));
        add_expense(&storage, &cash, &rent, 999_900, (2024, 2, 29));

        let report = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 3)).unwrap();

        assert_eq!(report.total_amount, Money::from_units(100_000));
        assert_eq!(report.total_count, 3);

        assert_eq!(report.by_category.len(), 2);
        assert_eq!(report.by_category[0].category_name, "Rent");
        assert_eq!(report.by_category[0].percentage, 80.0);
        assert_eq!(report.by_category[1].category_name, "Food");
        assert_eq!(report.by_category[1].count, 2);
        assert_eq!(report.by_category[1].total_amount, Money::from_units(20_000));

        assert_eq!(
            report.shared_expenses.total_shared_amount,
            Money::from_units(80_000)
        );
        assert_eq!(report.shared_expenses.split_amount, Money::from_units(40_000));
        assert_eq!(report.shared_expenses.categories.len(), 1);

        assert_eq!(report.by_card.len(), 2);
        assert_eq!(report.by_card[0].card_name, "Visa");
        assert_eq!(report.by_card[0].total_amount, Money::from_units(95_000));
        assert_eq!(report.by_card[1].percentage, 5.0);
    }

    #[test]
    fn test_card_filter_omits_card_breakdown() {
        let (_temp_dir, storage) = create_test_storage();
        let visa = add_card(&storage, "Visa");
        let cash = add_card(&storage, "Cash");
        let food = add_category(&storage, "Food", false);

        add_expense(&storage, &visa, &food, 10_000, (2024, 5, 2));
        add_expense(&storage, &cash, &food, 20_000, (2024, 5, 3));

        let filter = ReportFilter::month(2024, 5).for_card(visa.id);
        let report = MonthlyReport::generate(&storage, &filter).unwrap();

        assert_eq!(report.total_amount, Money::from_units(100));
        assert_eq!(report.total_count, 1);
        assert!(report.by_card.is_empty());
        assert_eq!(report.by_category[0].percentage, 100.0);
    }

    #[test]
    fn test_empty_month() {
        let (_temp_dir, storage) = create_test_storage();
        let report = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 1)).unwrap();

        assert!(report.total_amount.is_zero());
        assert_eq!(report.total_count, 0);
        assert!(report.by_category.is_empty());
        assert!(report.by_card.is_empty());
        assert!(report.shared_expenses.split_amount.is_zero());
        assert!(report
            .format_terminal("¥")
            .contains("No expenses recorded"));
    }

    #[test]
    fn test_month_required() {
        let (_temp_dir, storage) = create_test_storage();
        let err = MonthlyReport::generate(&storage, &ReportFilter::year(2024)).unwrap_err();
        assert!(err.is_validation());

        let err = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 13)).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_ties_sorted_by_name() {
        let (_temp_dir, storage) = create_test_storage();
        let card = add_card(&storage, "Visa");
        let b = add_category(&storage, "Books", false);
        let a = add_category(&storage, "Apps", false);

        add_expense(&storage, &card, &b, 1_000, (2024, 6, 1));
        add_expense(&storage, &card, &a, 1_000, (2024, 6, 2));

        let report = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 6)).unwrap();
        let names: Vec<_> = report
            .by_category
            .iter()
            .map(|c| c.category_name.as_str())
            .collect();
        assert_eq!(names, vec!["Apps", "Books"]);
    }

    #[test]
    fn test_serialized_field_names() {
        let (_temp_dir, storage) = create_test_storage();
        let card = add_card(&storage, "Visa");
        let rent = add_category(&storage, "Rent", true);
        add_expense(&storage, &card, &rent, 12_345, (2024, 7, 7));

        let report = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 7)).unwrap();
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["totalAmount"], 123.45);
        assert_eq!(value["sharedExpenses"]["totalSharedAmount"], 123.45);
        assert_eq!(value["sharedExpenses"]["splitAmount"], 61.73);
        assert_eq!(value["byCategory"][0]["isShared"], true);
        assert_eq!(value["byCard"][0]["cardName"], "Visa");
    }

    #[test]
    fn test_terminal_and_csv_output() {
        let (_temp_dir, storage) = create_test_storage();
        let card = add_card(&storage, "Visa");
        let rent = add_category(&storage, "Rent", true);
        add_expense(&storage, &card, &rent, 10_000_000, (2024, 8, 1));

        let report = MonthlyReport::generate(&storage, &ReportFilter::month(2024, 8)).unwrap();

        let text = report.format_terminal("¥");
        assert!(text.contains("Monthly Report: 2024-08"));
        assert!(text.contains("Rent *"));
        assert!(text.contains("¥100,000"));
        assert!(text.contains("per person: ¥50,000"));

        let mut buf = Vec::new();
        report.export_csv(&mut buf).unwrap();
        let csv = String::from_utf8(buf).unwrap();
        assert!(csv.starts_with("Period,Section,Name,Shared,Amount,Count,Percentage"));
        assert!(csv.contains("2024-08,category,Rent,yes,100000.00,1,100.0"));
        assert!(csv.contains("2024-08,card,Visa,,100000.00,1,100.0"));
        assert!(csv.contains("2024-08,shared,Split per person,yes,50000.00,,"));
        assert!(csv.contains("2024-08,total,TOTAL,,100000.00,1,100.0"));
    }
}
