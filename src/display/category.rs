//! Category display formatting
//!
//! Shared categories are flagged in both the table and the detail view, since
//! their totals get split between the two household members in reports.

use crate::models::Category;

use super::column_width;

/// Format categories as a table
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'kakeibo category add <NAME>' to create one.\n"
            .to_string();
    }

    let name_width = column_width(categories.iter().map(|c| c.name.as_str()), 8);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:<7}  {:<6}  {}\n",
        "Category",
        "Color",
        "Shared",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:-<7}  {:-<6}  {:-<36}\n",
        "",
        "",
        "",
        "",
        width = name_width
    ));

    for category in categories {
        output.push_str(&format!(
            "{:<width$}  {:<7}  {:<6}  {}\n",
            category.name,
            category.color,
            if category.is_shared { "yes" } else { "" },
            category.id,
            width = name_width
        ));
    }

    output
}

/// Format category details
pub fn format_category_details(category: &Category, expense_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Category: {}\n", category.name));
    output.push_str(&format!("  ID:       {}\n", category.id));
    output.push_str(&format!("  Color:    {}\n", category.color));
    output.push_str(&format!(
        "  Shared:   {}\n",
        if category.is_shared {
            "Yes (split 50/50)"
        } else {
            "No"
        }
    ));
    output.push_str(&format!("  Expenses: {}\n", expense_count));

    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        category.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        category.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
