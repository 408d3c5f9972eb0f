//! Expense model
//!
//! A single spending record tagged with one card and one category.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::card::Card;
use super::category::Category;
use super::ids::{CardId, CategoryId, ExpenseId};
use super::money::Money;
use crate::error::{KakeiboError, KakeiboResult};

const MAX_DESCRIPTION_LEN: usize = 500;

/// Largest amount a single expense may carry
pub const MAX_EXPENSE_AMOUNT: Money = Money::from_units(10_000_000);

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Amount spent (always positive)
    pub amount: Money,

    /// Day the money was spent
    pub date: NaiveDate,

    /// Free-form description
    #[serde(default)]
    pub description: String,

    /// Card the expense was paid with
    pub card_id: CardId,

    /// Category the expense belongs to
    pub category_id: CategoryId,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense
    pub fn new(
        amount: Money,
        date: NaiveDate,
        card_id: CardId,
        category_id: CategoryId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            amount,
            date,
            description: String::new(),
            card_id,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Validate amount and description
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.amount > MAX_EXPENSE_AMOUNT {
            return Err(ExpenseValidationError::AmountTooLarge(self.amount));
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(ExpenseValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.amount)?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    DescriptionTooLong(usize),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be greater than 0, got {}", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} exceeds the maximum of {}", amount, MAX_EXPENSE_AMOUNT)
            }
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Parse an expense date given as `YYYY-MM-DD` or an RFC 3339 timestamp
pub fn parse_expense_date(input: &str) -> KakeiboResult<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            KakeiboError::InvalidDate(format!(
                "'{}' is not a valid date, use YYYY-MM-DD",
                input
            ))
        })
}

/// Reject dates after `today`
pub fn ensure_not_future(date: NaiveDate, today: NaiveDate) -> KakeiboResult<()> {
    if date > today {
        return Err(KakeiboError::FutureDate(date));
    }
    Ok(())
}

/// An expense with its card and category resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseView {
    #[serde(flatten)]
    pub expense: Expense,
    pub card: Card,
    pub category: Category,
}

impl ExpenseView {
    pub fn new(expense: Expense, card: Card, category: Category) -> Self {
        Self {
            expense,
            card,
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expense {
        Expense::new(
            Money::from_units(1500),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            CardId::new(),
            CategoryId::new(),
        )
    }

    #[test]
    fn test_new_expense() {
        let expense = sample().with_description("Lunch");
        assert_eq!(expense.amount, Money::from_units(1500));
        assert_eq!(expense.description, "Lunch");
        assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_validation() {
        let mut expense = sample();
        assert!(expense.validate().is_ok());

        expense.amount = Money::zero();
        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));

        expense.amount = Money::from_units(-100);
        assert!(expense.validate().is_err());

        expense.amount = MAX_EXPENSE_AMOUNT;
        assert!(expense.validate().is_ok());

        expense.amount = MAX_EXPENSE_AMOUNT + Money::from_minor_units(1);
        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::AmountTooLarge(_))
        ));

        expense.amount = Money::from_units(1);
        expense.description = "d".repeat(501);
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::DescriptionTooLong(501))
        );
    }

    #[test]
    fn test_parse_expense_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_expense_date("2024-01-15").unwrap(), expected);
        assert_eq!(
            parse_expense_date("2024-01-15T10:30:00Z").unwrap(),
            expected
        );
        assert_eq!(
            parse_expense_date("2024-01-15T10:30:00+09:00").unwrap(),
            expected
        );

        assert!(matches!(
            parse_expense_date("invalid-date"),
            Err(KakeiboError::InvalidDate(_))
        ));
        assert!(parse_expense_date("2024-13-01").is_err());
    }

    #[test]
    fn test_ensure_not_future() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(ensure_not_future(today, today).is_ok());
        assert!(ensure_not_future(today.pred_opt().unwrap(), today).is_ok());
        assert!(matches!(
            ensure_not_future(today.succ_opt().unwrap(), today),
            Err(KakeiboError::FutureDate(_))
        ));
    }

    #[test]
    fn test_view_serializes_flat_with_relations() {
        let card = Card::new("Visa", "#3B82F6");
        let category = Category::new("Food", "#10B981");
        let mut expense = sample();
        expense.card_id = card.id;
        expense.category_id = category.id;

        let view = ExpenseView::new(expense.clone(), card, category);
        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["id"], expense.id.to_string());
        assert_eq!(value["amount"], 1500);
        assert_eq!(value["date"], "2024-03-15");
        assert_eq!(value["cardId"], expense.card_id.to_string());
        assert_eq!(value["card"]["name"], "Visa");
        assert_eq!(value["category"]["name"], "Food");
    }
}
