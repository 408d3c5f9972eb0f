//! Audit trail for Kakeibo
//!
//! Every create, update and delete of a card, category or expense is appended
//! to `audit.log` as one JSON line with before/after snapshots.

mod diff;
mod entry;
mod logger;

pub use diff::summarize_changes;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
