//! Configuration module for Kakeibo
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Environment overrides for the server

pub mod paths;
pub mod settings;

pub use paths::KakeiboPaths;
pub use settings::{ServerSettings, Settings};
