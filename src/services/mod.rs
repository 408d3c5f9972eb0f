//! Service layer for Kakeibo
//!
//! Business rules on top of storage: validation, reference checks and audit
//! logging. The HTTP handlers and the CLI both go through these services.

pub mod card;
pub mod category;
pub mod expense;

pub use card::{CardService, CardUpdate};
pub use category::{CategoryService, CategoryUpdate};
pub use expense::{
    ExpenseFilter, ExpenseInput, ExpensePage, ExpenseService, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
