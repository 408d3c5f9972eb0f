//! Expense repository backed by expenses.json
//!
//! Keeps `by_card` and `by_category` indexes so that reference checks on
//! card/category deletion don't scan every expense.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;

use crate::error::KakeiboResult;
use crate::models::{CardId, CategoryId, Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with indexing
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    by_card: RwLock<HashMap<CardId, Vec<ExpenseId>>>,
    by_category: RwLock<HashMap<CategoryId, Vec<ExpenseId>>>,
}

fn unindex<K: std::hash::Hash + Eq>(index: &mut HashMap<K, Vec<ExpenseId>>, key: &K, id: ExpenseId) {
    if let Some(ids) = index.get_mut(key) {
        ids.retain(|&existing| existing != id);
        if ids.is_empty() {
            index.remove(key);
        }
    }
}

/// Newest date first, ties broken by creation time
fn sort_newest_first(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.created_at.cmp(&a.created_at))
            .then(a.id.cmp(&b.id))
    });
}

impl ExpenseRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_card: RwLock::new(HashMap::new()),
            by_category: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and rebuild indexes
    pub fn load(&self) -> KakeiboResult<()> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_card = write_lock(&self.by_card)?;
        let mut by_category = write_lock(&self.by_category)?;

        data.clear();
        by_card.clear();
        by_category.clear();

        for expense in file_data.expenses {
            by_card.entry(expense.card_id).or_default().push(expense.id);
            by_category
                .entry(expense.category_id)
                .or_default()
                .push(expense.id);
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    pub fn save(&self) -> KakeiboResult<()> {
        let file_data = ExpenseData {
            expenses: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: ExpenseId) -> KakeiboResult<Option<Expense>> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All expenses, newest first
    pub fn get_all(&self) -> KakeiboResult<Vec<Expense>> {
        let mut expenses: Vec<_> = read_lock(&self.data)?.values().cloned().collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses paid with a card, newest first
    pub fn get_by_card(&self, card_id: CardId) -> KakeiboResult<Vec<Expense>> {
        let data = read_lock(&self.data)?;
        let by_card = read_lock(&self.by_card)?;

        let mut expenses: Vec<_> = by_card
            .get(&card_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id).cloned())
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses in a category, newest first
    pub fn get_by_category(&self, category_id: CategoryId) -> KakeiboResult<Vec<Expense>> {
        let data = read_lock(&self.data)?;
        let by_category = read_lock(&self.by_category)?;

        let mut expenses: Vec<_> = by_category
            .get(&category_id)
            .into_iter()
            .flatten()
            .filter_map(|id| data.get(id).cloned())
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    /// Expenses dated within `start..=end`, newest first
    pub fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> KakeiboResult<Vec<Expense>> {
        let data = read_lock(&self.data)?;
        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.date >= start && e.date <= end)
            .cloned()
            .collect();
        sort_newest_first(&mut expenses);
        Ok(expenses)
    }

    pub fn count_by_card(&self, card_id: CardId) -> KakeiboResult<usize> {
        Ok(read_lock(&self.by_card)?.get(&card_id).map_or(0, Vec::len))
    }

    pub fn count_by_category(&self, category_id: CategoryId) -> KakeiboResult<usize> {
        Ok(read_lock(&self.by_category)?
            .get(&category_id)
            .map_or(0, Vec::len))
    }

    /// Insert or update an expense, moving it between index buckets as needed
    pub fn upsert(&self, expense: Expense) -> KakeiboResult<()> {
        let mut data = write_lock(&self.data)?;
        let mut by_card = write_lock(&self.by_card)?;
        let mut by_category = write_lock(&self.by_category)?;

        if let Some(old) = data.get(&expense.id) {
            unindex(&mut by_card, &old.card_id, expense.id);
            unindex(&mut by_category, &old.category_id, expense.id);
        }

        by_card.entry(expense.card_id).or_default().push(expense.id);
        by_category
            .entry(expense.category_id)
            .or_default()
            .push(expense.id);

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Remove an expense, returning whether it existed
    pub fn delete(&self, id: ExpenseId) -> KakeiboResult<bool> {
        let mut data = write_lock(&self.data)?;
        let mut by_card = write_lock(&self.by_card)?;
        let mut by_category = write_lock(&self.by_category)?;

        match data.remove(&id) {
            Some(expense) => {
                unindex(&mut by_card, &expense.card_id, id);
                unindex(&mut by_category, &expense.category_id, id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn count(&self) -> KakeiboResult<usize> {
        Ok(read_lock(&self.data)?.len())
    }
}
