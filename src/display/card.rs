//! Card display formatting

use crate::models::Card;

use super::column_width;

/// Format cards as a table
pub fn format_card_list(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards found.\n\nRun 'kakeibo card add <NAME>' to create one.\n".to_string();
    }

    let name_width = column_width(cards.iter().map(|c| c.name.as_str()), 4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<width$}  {:<7}  {}\n",
        "Card",
        "Color",
        "ID",
        width = name_width
    ));
    output.push_str(&format!(
        "{:-<width$}  {:-<7}  {:-<36}\n",
        "",
        "",
        "",
        width = name_width
    ));

    for card in cards {
        output.push_str(&format!(
            "{:<width$}  {:<7}  {}\n",
            card.name,
            card.color,
            card.id,
            width = name_width
        ));
    }

    output
}

/// Format card details, including how many expenses use it
pub fn format_card_details(card: &Card, expense_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Card: {}\n", card.name));
    output.push_str(&format!("  ID:       {}\n", card.id));
    output.push_str(&format!("  Color:    {}\n", card.color));
    output.push_str(&format!("  Expenses: {}\n", expense_count));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        card.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        card.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_list() {
        assert!(format_card_list(&[]).contains("No cards found"));
    }

    #[test]
    fn test_format_card_list() {
        let cards = vec![Card::new("Visa", "#3B82F6"), Card::new("Mastercard", "#F00")];
        let output = format_card_list(&cards);

        assert!(output.contains("Visa"));
        assert!(output.contains("Mastercard"));
        assert!(output.contains("#F00"));
        assert!(output.contains(&cards[0].id.to_string()));
    }

    #[test]
    fn test_format_card_details() {
        let card = Card::new("Visa", "#3B82F6");
        let output = format_card_details(&card, 3);
        assert!(output.starts_with("Card: Visa"));
        assert!(output.contains("Expenses: 3"));
    }
}
