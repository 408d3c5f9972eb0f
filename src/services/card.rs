//! Card service
//!
//! CRUD for payment cards. A card can only be deleted once no expense
//! references it.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{KakeiboError, KakeiboResult};
use crate::models::{Card, CardId, DEFAULT_CARD_COLOR};
use crate::storage::Storage;

/// Fields to change on an existing card; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct CardUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Service for card management
pub struct CardService<'a> {
    storage: &'a Storage,
}

fn color_or_default(color: Option<&str>) -> String {
    match color.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CARD_COLOR.to_string(),
    }
}

impl<'a> CardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a card; a missing color falls back to the default blue
    pub fn create(&self, name: &str, color: Option<&str>) -> KakeiboResult<Card> {
        let card = Card::new(name.trim(), color_or_default(color));
        card.validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_create(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;
        info!(card_id = %card.id, name = %card.name, "card created");

        Ok(card)
    }

    /// Get a card, failing with `NotFound` when it doesn't exist
    pub fn get(&self, id: CardId) -> KakeiboResult<Card> {
        self.storage
            .cards
            .get(id)?
            .ok_or_else(|| KakeiboError::card_not_found(id.to_string()))
    }

    /// Find a card by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> KakeiboResult<Option<Card>> {
        if let Some(card) = self.storage.cards.get_by_name(identifier)? {
            return Ok(Some(card));
        }
        match identifier.parse::<CardId>() {
            Ok(id) => self.storage.cards.get(id),
            Err(_) => Ok(None),
        }
    }

    /// All cards, newest first
    pub fn list(&self) -> KakeiboResult<Vec<Card>> {
        self.storage.cards.get_all()
    }

    pub fn update(&self, id: CardId, changes: CardUpdate) -> KakeiboResult<Card> {
        let before = self.get(id)?;
        let mut card = before.clone();

        if let Some(name) = changes.name {
            card.name = name.trim().to_string();
        }
        if let Some(color) = changes.color {
            card.color = color_or_default(Some(&color));
        }

        card.validate()
            .map_err(|e| KakeiboError::Validation(e.to_string()))?;
        card.updated_at = chrono::Utc::now();

        self.storage.cards.upsert(card.clone())?;
        self.storage.cards.save()?;

        self.storage.log_update(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &before,
            &card,
        )?;

        Ok(card)
    }

    /// Delete a card that no expense references
    pub fn delete(&self, id: CardId) -> KakeiboResult<Card> {
        let card = self.get(id)?;

        let in_use = self.storage.expenses.count_by_card(id)?;
        if in_use > 0 {
            return Err(KakeiboError::InUse {
                entity_type: "Card",
                identifier: card.name,
            });
        }

        self.storage.cards.delete(id)?;
        self.storage.cards.save()?;

        self.storage.log_delete(
            EntityType::Card,
            card.id.to_string(),
            Some(card.name.clone()),
            &card,
        )?;
        info!(card_id = %card.id, "card deleted");

        Ok(card)
    }
}
