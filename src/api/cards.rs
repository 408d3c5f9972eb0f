//! `/api/cards` handlers

use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use crate::models::CardId;
use crate::services::{CardService, CardUpdate};

use super::error::ApiError;
use super::extract::{path_id, ApiJson};
use super::response::{created, message, ok};
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct CardRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let cards = CardService::new(&state.storage).list()?;
    Ok(ok("Cards retrieved successfully", cards))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: CardId = path_id(&id, "card")?;
    let card = CardService::new(&state.storage).get(id)?;
    Ok(ok("Card retrieved successfully", card))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CardRequest>,
) -> Result<Response, ApiError> {
    let _guard = state.writes.lock().await;
    let card = CardService::new(&state.storage).create(&req.name, req.color.as_deref())?;
    Ok(created("Card created successfully", card))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CardRequest>,
) -> Result<Response, ApiError> {
    let id: CardId = path_id(&id, "card")?;
    let _guard = state.writes.lock().await;
    let card = CardService::new(&state.storage).update(
        id,
        CardUpdate {
            name: Some(req.name),
            color: req.color,
        },
    )?;
    Ok(ok("Card updated successfully", card))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: CardId = path_id(&id, "card")?;
    let _guard = state.writes.lock().await;
    CardService::new(&state.storage).delete(id)?;
    Ok(message("Card deleted successfully"))
}
