//! Category service
//!
//! CRUD for spending categories. Names are unique ignoring case, and a
//! category can only be deleted once no expense references it.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{KakeiboError, KakeiboResult};
use crate::models::{Category, CategoryId, DEFAULT_CATEGORY_COLOR};
use crate::storage::Storage;

/// Fields to change on an existing category; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub is_shared: Option<bool>,
}

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

fn color_or_default(color: Option<&str>) -> String {
    match color.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY_COLOR.to_string(),
    }
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        name: &str,
        color: Option<&str>,
        is_shared: bool,
    ) -> KakeiboResult<Category> {
        let mut category = Category::new(name.trim(), color_or_default(color));
        category.is_shared = is_shared;
        category
            .validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;

        if self.storage.categories.name_exists(&category.name, None)? {
            return Err(KakeiboError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(category_id = %category.id, name = %category.name, shared = category.is_shared, "category created");

        Ok(category)
    }

    /// Get a category, failing with `NotFound` when it doesn't exist
    pub fn get(&self, id: CategoryId) -> KakeiboResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| KakeiboError::category_not_found(id.to_string()))
    }

    /// Find a category by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> KakeiboResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }
        match identifier.parse::<CategoryId>() {
            Ok(id) => self.storage.categories.get(id),
            Err(_) => Ok(None),
        }
    }

    /// All categories, newest first
    pub fn list(&self) -> KakeiboResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    pub fn update(&self, id: CategoryId, changes: CategoryUpdate) -> KakeiboResult<Category> {
        let before = self.get(id)?;
        let mut category = before.clone();

        if let Some(name) = changes.name {
            category.name = name.trim().to_string();
        }
        if let Some(color) = changes.color {
            category.color = color_or_default(Some(&color));
        }
        if let Some(is_shared) = changes.is_shared {
            category.is_shared = is_shared;
        }

        category
            .validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;

        if self.storage.categories.name_exists(&category.name, Some(id))? {
            return Err(KakeiboError::Duplicate {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        category.updated_at = chrono::Utc::now();
        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category that no expense references
    pub fn delete(&self, id: CategoryId) -> KakeiboResult<Category> {
        let category = self.get(id)?;

        if self.storage.expenses.count_by_category(id)? > 0 {
            return Err(KakeiboError::InUse {
                entity_type: "Category",
                identifier: category.name,
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        info!(category_id = %category.id, "category deleted");

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::KakeiboPaths;
    use crate::models::{CardId, Expense, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KakeiboPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let rent = service.create("Rent", Some("#EF4444"), true).unwrap();
        assert!(rent.is_shared);

        let hobby = service.create("Hobby", None, false).unwrap();
        assert_eq!(hobby.color, DEFAULT_CATEGORY_COLOR);
        assert!(!hobby.is_shared);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Groceries", None, false).unwrap();
        let err = service.create("groceries", None, true).unwrap_err();
        assert!(matches!(err, KakeiboError::Duplicate { .. }));
    }

    #[test]
    fn test_update_checks_duplicates_excluding_self() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let food = service.create("Food", None, false).unwrap();
        service.create("Travel", None, false).unwrap();

        let renamed = service
            .update(
                food.id,
                CategoryUpdate {
                    name: Some("FOOD".into()),
                    is_shared: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(renamed.name, "FOOD");
        assert!(renamed.is_shared);

        let err = service
            .update(
                food.id,
                CategoryUpdate {
                    name: Some("travel".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, KakeiboError::Duplicate { .. }));
    }

    #[test]
    fn test_validation_errors() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert!(service.create(" ", None, false).unwrap_err().is_validation());
        assert!(service
            .create(&"c".repeat(51), None, false)
            .unwrap_err()
            .is_validation());
        assert!(service
            .create("Food", Some("#12"), false)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_delete_blocked_by_expenses() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Food", None, false).unwrap();
        storage
            .expenses
            .upsert(Expense::new(
                Money::from_units(300),
                NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                CardId::new(),
                category.id,
            ))
            .unwrap();

        let err = service.delete(category.id).unwrap_err();
        assert!(matches!(err, KakeiboError::InUse { .. }));
        assert!(service.get(category.id).is_ok());
    }

    #[test]
    fn test_delete_unused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service.create("Misc", None, false).unwrap();
        service.delete(category.id).unwrap();
        assert!(service.get(category.id).unwrap_err().is_not_found());
    }
}
