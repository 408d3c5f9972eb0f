//! CSV export of expenses

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::KakeiboResult;
use crate::models::{Card, CardId, Category, CategoryId};
use crate::storage::Storage;

/// Export expenses dated within the optional bounds, newest first
///
/// Returns the number of expense rows written.
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    writer: W,
) -> KakeiboResult<usize> {
    let cards: HashMap<CardId, Card> = storage
        .cards
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let categories: HashMap<CategoryId, Category> = storage
        .categories
        .get_all()?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "ID",
        "Date",
        "Card",
        "Category",
        "Shared",
        "Description",
        "Amount",
    ])?;

    let mut written = 0;
    for expense in storage.expenses.get_all()? {
        if from.is_some_and(|from| expense.date < from) || to.is_some_and(|to| expense.date > to) {
            continue;
        }

        let card = cards
            .get(&expense.card_id)
            .map(|c| c.name.as_str())
            .unwrap_or("Unknown");
        let category = categories.get(&expense.category_id);

        wtr.write_record([
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            card.to_string(),
            category.map(|c| c.name.clone()).unwrap_or_else(|| "Unknown".into()),
            category.is_some_and(|c| c.is_shared).to_string(),
            expense.description.clone(),
            format!("{:.2}", expense.amount.as_f64()),
        ])?;
        written += 1;
    }

    wtr.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::{add_card, add_category, add_expense, create_test_storage};

    #[test]
    fn test_export_expenses_csv() {
        let (_temp, storage) = create_test_storage();
        let card = add_card(&storage, "Visa");
        let rent = add_category(&storage, "Rent, Utilities", true);
        add_expense(&storage, &card, &rent, 150_050, (2024, 1, 5));
        add_expense(&storage, &card, &rent, 2_000, (2024, 2, 5));

        let mut buf = Vec::new();
        let written = export_expenses_csv(&storage, None, None, &mut buf).unwrap();
        assert_eq!(written, 2);

        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "ID,Date,Card,Category,Shared,Description,Amount");
        assert!(lines[1].contains("2024-02-05,Visa,\"Rent, Utilities\",true,,20.00"));
        assert!(lines[2].contains("2024-01-05"));
        assert!(lines[2].ends_with("1500.50"));
    }

    #[test]
    fn test_export_date_bounds() {
        let (_temp, storage) = create_test_storage();
        let card = add_card(&storage, "Visa");
        let food = add_category(&storage, "Food", false);
        add_expense(&storage, &card, &food, 100, (2024, 1, 31));
        add_expense(&storage, &card, &food, 100, (2024, 2, 1));
        add_expense(&storage, &card, &food, 100, (2024, 3, 1));

        let mut buf = Vec::new();
        let written = export_expenses_csv(
            &storage,
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 2, 29),
            &mut buf,
        )
        .unwrap();
        assert_eq!(written, 1);
    }
}
