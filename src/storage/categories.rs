//! Category repository backed by categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KakeiboResult;
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CategoryData {
    categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk, replacing whatever is in memory
    pub fn load(&self) -> KakeiboResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        data.extend(
            file_data
                .categories
                .into_iter()
                .map(|category| (category.id, category)),
        );
        Ok(())
    }

    pub fn save(&self) -> KakeiboResult<()> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> KakeiboResult<Option<Category>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All categories, newest first
    pub fn get_all(&self) -> KakeiboResult<Vec<Category>> {
        let data = read_lock(&self.data)?;
        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));
        Ok(categories)
    }

    /// Categories flagged as shared
    pub fn get_shared(&self) -> KakeiboResult<Vec<Category>> {
        Ok(self.get_all()?.into_iter().filter(|c| c.is_shared).collect())
    }

    /// Find a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> KakeiboResult<Option<Category>> {
        let data = read_lock(&self.data)?;
        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> KakeiboResult<()> {
        write_lock(&self.data)?.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> KakeiboResult<bool> {
        Ok(write_lock(&self.data)?.remove(&id).is_some())
    }

    pub fn exists(&self, id: CategoryId) -> KakeiboResult<bool> {
        Ok(read_lock(&self.data)?.contains_key(&id))
    }

    /// Check if a category name is taken, ignoring case and `exclude_id`
    pub fn name_exists(&self, name: &str, exclude_id: Option<CategoryId>) -> KakeiboResult<bool> {
        let data = read_lock(&self.data)?;
        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .any(|c| c.name.to_lowercase() == name_lower && Some(c.id) != exclude_id))
    }

    pub fn count(&self) -> KakeiboResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_save_and_reload_keeps_shared_flag() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let rent = Category::shared("Rent", "#EF4444");
        let id = rent.id;
        repo.upsert(rent).unwrap();
        repo.upsert(Category::new("Hobby", "#8B5CF6")).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.count().unwrap(), 2);
        assert!(repo2.get(id).unwrap().unwrap().is_shared);

        let shared = repo2.get_shared().unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].name, "Rent");
    }

    #[test]
    fn test_name_exists() {
        let (_temp_dir, repo) = create_test_repo();

        let category = Category::new("Groceries", "#10B981");
        let id = category.id;
        repo.upsert(category).unwrap();

        assert!(repo.name_exists("GROCERIES", None).unwrap());
        assert!(!repo.name_exists("groceries", Some(id)).unwrap());
        assert!(!repo.name_exists("Utilities", None).unwrap());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();

        let category = Category::new("Travel", "#F59E0B");
        let id = category.id;
        repo.upsert(category).unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get(id).unwrap().is_none());
    }
}
