//! Expense service
//!
//! Records expenses against existing cards and categories and serves the
//! paginated, filtered expense listing.

use std::collections::HashMap;

use chrono::{Local, NaiveDate, Utc};
use tracing::{debug, info};

use crate::audit::EntityType;
use crate::error::{KakeiboError, KakeiboResult};
use crate::models::{
    ensure_not_future, Card, CardId, Category, CategoryId, Expense, ExpenseId, ExpenseView, Money,
};
use crate::storage::Storage;

/// Page size used when a listing doesn't ask for one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a listing may request
pub const MAX_PAGE_SIZE: usize = 100;

/// Filter for listing expenses; date bounds are inclusive
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub card_id: Option<CardId>,
    pub category_id: Option<CategoryId>,
    /// 1-based page number
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn card(mut self, card_id: CardId) -> Self {
        self.card_id = Some(card_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        self.start_date.map_or(true, |start| expense.date >= start)
            && self.end_date.map_or(true, |end| expense.date <= end)
            && self.card_id.map_or(true, |id| expense.card_id == id)
            && self.category_id.map_or(true, |id| expense.category_id == id)
    }
}

/// One page of an expense listing
#[derive(Debug, Clone)]
pub struct ExpensePage {
    pub items: Vec<ExpenseView>,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Values for creating or replacing an expense
#[derive(Debug, Clone)]
pub struct ExpenseInput {
    pub amount: Money,
    pub date: NaiveDate,
    pub description: String,
    pub card_id: CardId,
    pub category_id: CategoryId,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
    page_size: usize,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Use `page_size` when a listing doesn't specify a limit
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Check the input and resolve its card and category
    fn check_input(&self, input: &ExpenseInput) -> KakeiboResult<(Card, Category)> {
        ensure_not_future(input.date, Local::now().date_naive())?;

        let card = self
            .storage
            .cards
            .get(input.card_id)?
            .ok_or_else(|| KakeiboError::card_not_found(input.card_id.to_string()))?;
        let category = self
            .storage
            .categories
            .get(input.category_id)?
            .ok_or_else(|| KakeiboError::category_not_found(input.category_id.to_string()))?;

        Ok((card, category))
    }

    pub fn create(&self, input: ExpenseInput) -> KakeiboResult<ExpenseView> {
        let expense = Expense::new(input.amount, input.date, input.card_id, input.category_id)
            .with_description(input.description.trim());
        expense
            .validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;
        let (card, category) = self.check_input(&input)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;
        info!(expense_id = %expense.id, amount = %expense.amount, "expense created");

        Ok(ExpenseView::new(expense, card, category))
    }

    /// Get an expense, failing with `NotFound` when it doesn't exist
    pub fn get(&self, id: ExpenseId) -> KakeiboResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| KakeiboError::expense_not_found(id.to_string()))
    }

    /// Find an expense by full id or by the short `exp-xxxxxxxx` prefix
    pub fn find(&self, identifier: &str) -> KakeiboResult<Option<Expense>> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.storage.expenses.get(id);
        }

        let prefix = identifier.trim();
        let prefix = prefix.strip_prefix("exp-").unwrap_or(prefix).to_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let mut matches: Vec<Expense> = self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .filter(|e| e.id.to_string().starts_with(&prefix))
            .collect();
        match matches.len() {
            0 | 1 => Ok(matches.pop()),
            n => Err(KakeiboError::Validation(format!(
                "'{}' matches {} expenses; use more of the id",
                identifier, n
            ))),
        }
    }

    /// Get an expense with its card and category
    pub fn get_view(&self, id: ExpenseId) -> KakeiboResult<ExpenseView> {
        let expense = self.get(id)?;
        self.view(expense)
    }

    fn view(&self, expense: Expense) -> KakeiboResult<ExpenseView> {
        let card = self
            .storage
            .cards
            .get(expense.card_id)?
            .ok_or_else(|| KakeiboError::card_not_found(expense.card_id.to_string()))?;
        let category = self
            .storage
            .categories
            .get(expense.category_id)?
            .ok_or_else(|| KakeiboError::category_not_found(expense.category_id.to_string()))?;
        Ok(ExpenseView::new(expense, card, category))
    }

    /// Filtered expenses, newest first, one page at a time
    pub fn list(&self, filter: &ExpenseFilter) -> KakeiboResult<ExpensePage> {
        let page = filter.page.filter(|&p| p > 0).unwrap_or(1);
        let limit = filter
            .limit
            .filter(|&l| l > 0)
            .unwrap_or(self.page_size)
            .min(MAX_PAGE_SIZE);

        let candidates = match (filter.card_id, filter.category_id) {
            (Some(card_id), _) => self.storage.expenses.get_by_card(card_id)?,
            (None, Some(category_id)) => self.storage.expenses.get_by_category(category_id)?,
            (None, None) => self.storage.expenses.get_all()?,
        };
        let matching: Vec<Expense> = candidates
            .into_iter()
            .filter(|e| filter.matches(e))
            .collect();

        let total_items = matching.len();
        let total_pages = total_items.div_ceil(limit);
        debug!(total_items, page, limit, "listing expenses");

        let cards: HashMap<CardId, Card> = self
            .storage
            .cards
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let categories: HashMap<CategoryId, Category> = self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let items = matching
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .map(|expense| {
                let card = cards
                    .get(&expense.card_id)
                    .cloned()
                    .ok_or_else(|| KakeiboError::card_not_found(expense.card_id.to_string()))?;
                let category = categories.get(&expense.category_id).cloned().ok_or_else(|| {
                    KakeiboError::category_not_found(expense.category_id.to_string())
                })?;
                Ok(ExpenseView::new(expense, card, category))
            })
            .collect::<KakeiboResult<Vec<_>>>()?;

        Ok(ExpensePage {
            items,
            page,
            limit,
            total_pages,
            total_items,
        })
    }

    /// Replace every editable field of an expense
    pub fn update(&self, id: ExpenseId, input: ExpenseInput) -> KakeiboResult<ExpenseView> {
        let before = self.get(id)?;

        let mut expense = before.clone();
        expense.amount = input.amount;
        expense.date = input.date;
        expense.description = input.description.trim().to_string();
        expense.card_id = input.card_id;
        expense.category_id = input.category_id;
        expense
            .validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;
        let (card, category) = self.check_input(&input)?;

        expense.updated_at = Utc::now();
        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        self.storage.log_update(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &before,
            &expense,
        )?;

        Ok(ExpenseView::new(expense, card, category))
    }

    pub fn delete(&self, id: ExpenseId) -> KakeiboResult<Expense> {
        let expense = self.get(id)?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        self.storage.log_delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.to_string()),
            &expense,
        )?;
        info!(expense_id = %expense.id, "expense deleted");

        Ok(expense)
    }
}
