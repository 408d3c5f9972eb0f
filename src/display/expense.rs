//! Expense display formatting

use crate::models::ExpenseView;
use crate::services::ExpensePage;

use super::fit;

/// Format one expense as a register row
fn format_expense_row(view: &ExpenseView, currency_symbol: &str) -> String {
    let expense = &view.expense;
    let shared = if view.category.is_shared { "*" } else { " " };

    format!(
        "{} {} {} {}{} {:>14}  {}",
        expense.id.short(),
        expense.date.format("%Y-%m-%d"),
        fit(&view.card.name, 12),
        fit(&view.category.name, 14),
        shared,
        expense.amount.format_with_symbol(currency_symbol),
        expense.description
    )
}

/// Format a page of expenses as a register
pub fn format_expense_page(page: &ExpensePage, currency_symbol: &str) -> String {
    if page.items.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:12} {:10} {:12} {:15} {:>14}  {}\n",
        "ID", "Date", "Card", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(80));
    output.push('\n');

    for view in &page.items {
        output.push_str(&format_expense_row(view, currency_symbol));
        output.push('\n');
    }

    output.push_str(&"-".repeat(80));
    output.push('\n');
    output.push_str(&format!(
        "Page {} of {} ({} expenses)  * shared category\n",
        page.page,
        page.total_pages.max(1),
        page.total_items
    ));

    output
}

/// Format expense details
pub fn format_expense_details(view: &ExpenseView, currency_symbol: &str) -> String {
    let expense = &view.expense;
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.id));
    output.push_str(&format!("  Date:        {}\n", expense.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "  Amount:      {}\n",
        expense.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Card:        {}\n", view.card.name));
    output.push_str(&format!(
        "  Category:    {}{}\n",
        view.category.name,
        if view.category.is_shared { " (shared)" } else { "" }
    ));
    if !expense.description.is_empty() {
        output.push_str(&format!("  Description: {}\n", expense.description));
    }

    output
}
