//! `/api/expenses` handlers

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::models::{
    ensure_not_future, parse_expense_date, CardId, CategoryId, ExpenseId, ExpenseView, Money,
};
use crate::services::{ExpenseFilter, ExpenseInput, ExpenseService};

use super::error::ApiError;
use super::extract::{field_id, path_id, ApiJson};
use super::response::{created, message, ok, PaginatedResponse};
use super::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub card_id: String,
    #[serde(default)]
    pub category_id: String,
}

impl ExpenseRequest {
    /// Check required fields, then parse date and ids in that order
    fn into_input(self) -> Result<ExpenseInput, ApiError> {
        let missing: Vec<&str> = [
            ("amount", !self.amount.is_positive()),
            ("date", self.date.trim().is_empty()),
            ("cardId", self.card_id.trim().is_empty()),
            ("categoryId", self.category_id.trim().is_empty()),
        ]
        .into_iter()
        .filter_map(|(field, bad)| bad.then_some(field))
        .collect();
        if !missing.is_empty() {
            return Err(ApiError::bad_request("VALIDATION_ERROR", "Validation failed")
                .with_details(format!("Missing or invalid fields: {}", missing.join(", "))));
        }

        let date = parse_expense_date(&self.date)?;
        ensure_not_future(date, Local::now().date_naive())?;

        let card_id: CardId = field_id(&self.card_id, "INVALID_CARD_ID", "card")?;
        let category_id: CategoryId = field_id(&self.category_id, "INVALID_CATEGORY_ID", "category")?;

        Ok(ExpenseInput {
            amount: self.amount,
            date,
            description: self.description,
            card_id,
            category_id,
        })
    }
}

/// Listing filters; values that don't parse are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseListQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub card_id: Option<String>,
    pub category_id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ExpenseListQuery {
    fn to_filter(&self) -> ExpenseFilter {
        let date = |s: &Option<String>| {
            s.as_deref()
                .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        };
        let positive = |s: &Option<String>| {
            s.as_deref()
                .and_then(|s| s.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
        };

        ExpenseFilter {
            start_date: date(&self.start_date),
            end_date: date(&self.end_date),
            card_id: self.card_id.as_deref().and_then(|s| CardId::parse(s).ok()),
            category_id: self
                .category_id
                .as_deref()
                .and_then(|s| CategoryId::parse(s).ok()),
            page: positive(&self.page),
            limit: positive(&self.limit),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Response, ApiError> {
    let page = ExpenseService::new(&state.storage)
        .with_page_size(state.page_size)
        .list(&query.to_filter())?;
    Ok(Json(PaginatedResponse::<ExpenseView>::from(page)).into_response())
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ExpenseId = path_id(&id, "expense")?;
    let expense = ExpenseService::new(&state.storage).get_view(id)?;
    Ok(ok("Expense retrieved successfully", expense))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ExpenseRequest>,
) -> Result<Response, ApiError> {
    let input = req.into_input()?;
    let _guard = state.writes.lock().await;
    let expense = ExpenseService::new(&state.storage).create(input)?;
    Ok(created("Expense created successfully", expense))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ExpenseRequest>,
) -> Result<Response, ApiError> {
    let id: ExpenseId = path_id(&id, "expense")?;
    let service = ExpenseService::new(&state.storage);
    // Existence is checked before the body so a missing expense wins over bad input
    service.get(id)?;
    let input = req.into_input()?;

    let _guard = state.writes.lock().await;
    let expense = service.update(id, input)?;
    Ok(ok("Expense updated successfully", expense))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: ExpenseId = path_id(&id, "expense")?;
    let _guard = state.writes.lock().await;
    ExpenseService::new(&state.storage).delete(id)?;
    Ok(message("Expense deleted successfully"))
}
