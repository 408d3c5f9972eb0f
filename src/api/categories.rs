//! `/api/categories` handlers

use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use crate::models::CategoryId;
use crate::services::{CategoryService, CategoryUpdate};

use super::error::ApiError;
use super::extract::{path_id, ApiJson};
use super::response::{created, message, ok};
use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_shared: Option<bool>,
}

pub async fn list(State(state): State<AppState>) -> Result<Response, ApiError> {
    let categories = CategoryService::new(&state.storage).list()?;
    Ok(ok("Categories retrieved successfully", categories))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: CategoryId = path_id(&id, "category")?;
    let category = CategoryService::new(&state.storage).get(id)?;
    Ok(ok("Category retrieved successfully", category))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Response, ApiError> {
    let _guard = state.writes.lock().await;
    let category = CategoryService::new(&state.storage).create(
        &req.name,
        req.color.as_deref(),
        req.is_shared.unwrap_or(false),
    )?;
    Ok(created("Category created successfully", category))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> Result<Response, ApiError> {
    let id: CategoryId = path_id(&id, "category")?;
    let _guard = state.writes.lock().await;
    let category = CategoryService::new(&state.storage).update(
        id,
        CategoryUpdate {
            name: Some(req.name),
            color: req.color,
            is_shared: req.is_shared,
        },
    )?;
    Ok(ok("Category updated successfully", category))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: CategoryId = path_id(&id, "category")?;
    let _guard = state.writes.lock().await;
    CategoryService::new(&state.storage).delete(id)?;
    Ok(message("Category deleted successfully"))
}
