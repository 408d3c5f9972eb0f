//! Kakeibo - household expense tracking with shared-expense reports
//!
//! This library provides the core of the Kakeibo expense tracker. Expenses are
//! recorded against payment cards and categories; categories marked as shared
//! are split evenly between two household members in the monthly and yearly
//! reports.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (cards, categories, expenses, money)
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `reports`: Monthly and yearly aggregation
//! - `api`: HTTP API served with axum
//! - `cli`, `display`, `export`: Command-line front end
//!
//! # Example
//!
//! ```rust,ignore
//! use kakeibo::config::{paths::KakeiboPaths, settings::Settings};
//! use kakeibo::storage::Storage;
//!
//! let paths = KakeiboPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod api;
pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{KakeiboError, KakeiboResult};
