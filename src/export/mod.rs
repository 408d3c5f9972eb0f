//! Export module for Kakeibo
//!
//! Spreadsheet-compatible CSV export of recorded expenses. Report CSVs live
//! with the reports themselves.

pub mod csv;

pub use self::csv::export_expenses_csv;
