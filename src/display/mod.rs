//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for cards, categories and expenses.

pub mod card;
pub mod category;
pub mod expense;

pub use card::{format_card_details, format_card_list};
pub use category::{format_category_details, format_category_list};
pub use expense::{format_expense_details, format_expense_page};

/// Pad or cut `s` to exactly `width` characters
pub(crate) fn fit(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        format!("{:width$}", s, width = width)
    } else {
        let cut: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Widest of `names`, never narrower than `min`
pub(crate) fn column_width<'a>(names: impl Iterator<Item = &'a str>, min: usize) -> usize {
    names.map(|n| n.chars().count()).max().unwrap_or(min).max(min)
}
