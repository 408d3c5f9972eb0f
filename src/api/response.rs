//! Success envelopes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::ExpensePage;

/// `{"message": ..., "data": ...}`; `data` is omitted when absent
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 200 with a message and payload
pub fn ok<T: Serialize>(message: &str, data: T) -> Response {
    respond(StatusCode::OK, message, Some(data))
}

/// 201 with a message and the created entity
pub fn created<T: Serialize>(message: &str, data: T) -> Response {
    respond(StatusCode::CREATED, message, Some(data))
}

/// 200 with only a message
pub fn message(message: &str) -> Response {
    respond::<()>(StatusCode::OK, message, None)
}

fn respond<T: Serialize>(status: StatusCode, message: &str, data: Option<T>) -> Response {
    let body = SuccessResponse {
        message: message.to_string(),
        data,
    };
    (status, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// `{"data": [...], "pagination": {...}}`
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl From<ExpensePage> for PaginatedResponse<crate::models::ExpenseView> {
    fn from(page: ExpensePage) -> Self {
        Self {
            pagination: Pagination {
                page: page.page,
                limit: page.limit,
                total_pages: page.total_pages,
                total_items: page.total_items,
            },
            data: page.items,
        }
    }
}
