//! Core data models for Kakeibo
//!
//! Cards, categories and the expenses recorded against them, plus the
//! strongly-typed ids and the money type they share.

pub mod card;
pub mod category;
pub mod color;
pub mod expense;
pub mod ids;
pub mod money;

pub use card::{Card, CardValidationError, DEFAULT_CARD_COLOR};
pub use category::{Category, CategoryValidationError, DEFAULT_CATEGORY_COLOR};
pub use expense::{
    ensure_not_future, parse_expense_date, Expense, ExpenseValidationError, ExpenseView,
    MAX_EXPENSE_AMOUNT,
};
pub use ids::{CardId, CategoryId, ExpenseId};
pub use money::{Money, MoneyParseError};
