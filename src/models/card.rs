//! Card model
//!
//! A payment card (credit card, debit card, cash wallet) that expenses are
//! tagged with.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::is_valid_hex_color;
use super::ids::CardId;

/// Color given to cards created without one
pub const DEFAULT_CARD_COLOR: &str = "#3B82F6";

const MAX_NAME_LEN: usize = 100;

/// A payment card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier
    pub id: CardId,

    /// Card name (e.g., "Rakuten Visa")
    pub name: String,

    /// Display color as `#RRGGBB`
    pub color: String,

    /// When the card was created
    pub created_at: DateTime<Utc>,

    /// When the card was last modified
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Create a new card
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CardId::new(),
            name: name.into(),
            color: color.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the card
    pub fn validate(&self) -> Result<(), CardValidationError> {
        if self.name.trim().is_empty() {
            return Err(CardValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CardValidationError::NameTooLong(len));
        }

        if !is_valid_hex_color(&self.color) {
            return Err(CardValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Card name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Card name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::InvalidColor(color) => {
                write!(f, "Card color must be a hex color like #3B82F6, got '{}'", color)
            }
        }
    }
}

impl std::error::Error for CardValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card() {
        let card = Card::new("Visa", "#FF0000");
        assert_eq!(card.name, "Visa");
        assert_eq!(card.color, "#FF0000");
        assert_eq!(card.created_at, card.updated_at);
    }

    #[test]
    fn test_validation() {
        let mut card = Card::new("Valid Name", DEFAULT_CARD_COLOR);
        assert!(card.validate().is_ok());

        card.name = "   ".to_string();
        assert_eq!(card.validate(), Err(CardValidationError::EmptyName));

        card.name = "a".repeat(101);
        assert_eq!(card.validate(), Err(CardValidationError::NameTooLong(101)));

        card.name = "a".repeat(100);
        assert!(card.validate().is_ok());

        card.color = "invalid-color".to_string();
        assert!(matches!(
            card.validate(),
            Err(CardValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let card = Card::new("Visa", "#FF0000");
        let value = serde_json::to_value(&card).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert_eq!(value["name"], "Visa");
    }
}
