//! Card repository backed by cards.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::KakeiboResult;
use crate::models::{Card, CardId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct CardData {
    cards: Vec<Card>,
}

/// Repository for card persistence
pub struct CardRepository {
    path: PathBuf,
    data: RwLock<HashMap<CardId, Card>>,
}

impl CardRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load cards from disk, replacing whatever is in memory
    pub fn load(&self) -> KakeiboResult<()> {
        let file_data: CardData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        data.extend(file_data.cards.into_iter().map(|card| (card.id, card)));
        Ok(())
    }

    /// Save cards to disk
    pub fn save(&self) -> KakeiboResult<()> {
        let file_data = CardData {
            cards: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CardId) -> KakeiboResult<Option<Card>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All cards, newest first
    pub fn get_all(&self) -> KakeiboResult<Vec<Card>> {
        let data = read_lock(&self.data)?;
        let mut cards: Vec<_> = data.values().cloned().collect();
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.name.cmp(&b.name)));
        Ok(cards)
    }

    /// Find a card by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> KakeiboResult<Option<Card>> {
        let data = read_lock(&self.data)?;
        let name_lower = name.trim().to_lowercase();
        Ok(data
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, card: Card) -> KakeiboResult<()> {
        write_lock(&self.data)?.insert(card.id, card);
        Ok(())
    }

    /// Remove a card, returning whether it existed
    pub fn delete(&self, id: CardId) -> KakeiboResult<bool> {
        Ok(write_lock(&self.data)?.remove(&id).is_some())
    }

    pub fn exists(&self, id: CardId) -> KakeiboResult<bool> {
        Ok(read_lock(&self.data)?.contains_key(&id))
    }

    pub fn count(&self) -> KakeiboResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CardRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CardRepository::new(temp_dir.path().join("cards.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let card = Card::new("Rakuten Visa", "#BF0000");
        let id = card.id;
        repo.upsert(card).unwrap();
        repo.save().unwrap();

        let repo2 = CardRepository::new(temp_dir.path().join("cards.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "Rakuten Visa");
    }

    #[test]
    fn test_get_all_newest_first() {
        let (_temp_dir, repo) = create_test_repo();

        let mut older = Card::new("Older", "#000000");
        older.created_at -= Duration::days(1);
        let newer = Card::new("Newer", "#FFFFFF");

        repo.upsert(older).unwrap();
        repo.upsert(newer).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn test_get_by_name_and_delete() {
        let (_temp_dir, repo) = create_test_repo();

        let card = Card::new("Cash", "#333");
        let id = card.id;
        repo.upsert(card).unwrap();

        assert!(repo.get_by_name("  cash ").unwrap().is_some());
        assert!(repo.get_by_name("other").unwrap().is_none());

        assert!(repo.delete(id).unwrap());
        assert!(!repo.exists(id).unwrap());
        assert!(!repo.delete(id).unwrap());
    }
}
