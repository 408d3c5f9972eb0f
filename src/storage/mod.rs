//! Storage layer for Kakeibo
//!
//! Each entity type lives in its own JSON file under `<base>/data/`, held in
//! memory behind a `RwLock` and rewritten atomically on save.

pub mod cards;
pub mod categories;
pub mod expenses;
pub mod file_io;

pub use cards::CardRepository;
pub use categories::CategoryRepository;
pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_json_atomic};

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::KakeiboPaths;
use crate::error::{KakeiboError, KakeiboResult};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> KakeiboResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|e| KakeiboError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> KakeiboResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|e| KakeiboError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Owns every repository plus the audit log
pub struct Storage {
    paths: KakeiboPaths,
    pub cards: CardRepository,
    pub categories: CategoryRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create storage rooted at `paths`, creating directories as needed
    ///
    /// Nothing is read from disk until [`Storage::load_all`] is called.
    pub fn new(paths: KakeiboPaths) -> KakeiboResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            cards: CardRepository::new(paths.cards_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Create storage and load everything from disk
    pub fn open(paths: KakeiboPaths) -> KakeiboResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &KakeiboPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> KakeiboResult<()> {
        self.cards.load()?;
        self.categories.load()?;
        self.expenses.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> KakeiboResult<()> {
        self.cards.save()?;
        self.categories.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Whether the data directory is still present on disk
    pub fn is_available(&self) -> bool {
        self.paths.data_dir().is_dir()
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> KakeiboResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> KakeiboResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> KakeiboResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }
}
