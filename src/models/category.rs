//! Category model
//!
//! Categories classify expenses. A category flagged as shared has its
//! expenses split evenly between the two members of the household in reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::is_valid_hex_color;
use super::ids::CategoryId;

/// Color given to categories created without one
pub const DEFAULT_CATEGORY_COLOR: &str = "#10B981";

const MAX_NAME_LEN: usize = 50;

/// A spending category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name, unique ignoring case
    pub name: String,

    /// Display color as `#RRGGBB`
    pub color: String,

    /// Whether expenses in this category are split between both members
    #[serde(default)]
    pub is_shared: bool,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new, non-shared category
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: color.into(),
            is_shared: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new category that is split between both members
    pub fn shared(name: impl Into<String>, color: impl Into<String>) -> Self {
        let mut category = Self::new(name, color);
        category.is_shared = true;
        category
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if !is_valid_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_shared {
            write!(f, "{} (shared)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::InvalidColor(color) => {
                write!(f, "Category color must be a hex color like #10B981, got '{}'", color)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Groceries", DEFAULT_CATEGORY_COLOR);
        assert_eq!(category.name, "Groceries");
        assert!(!category.is_shared);

        let shared = Category::shared("Rent", "#FF0000");
        assert!(shared.is_shared);
        assert_eq!(shared.to_string(), "Rent (shared)");
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Food", "#FFF");
        assert!(category.validate().is_ok());

        category.name = String::new();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "x".repeat(51);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(51))
        );

        category.name = "Food".to_string();
        category.color = "green".to_string();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_serializes_is_shared() {
        let category = Category::shared("Rent", "#FF0000");
        let value = serde_json::to_value(&category).unwrap();
        assert_eq!(value["isShared"], true);
    }
}
