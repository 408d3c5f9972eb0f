//! HTTP error mapping
//!
//! Handlers return [`ApiError`]. Its response carries the error body as a
//! response extension; [`render_errors`] turns that into the JSON envelope once
//! the request path is known.

use axum::extract::rejection::JsonRejection;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::error::KakeiboError;

/// Machine-readable error body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error response: status plus code, message and optional details
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.body.details = Some(details.into());
        self
    }

    pub fn invalid_uuid(entity: &str, details: impl std::fmt::Display) -> Self {
        Self::bad_request("INVALID_UUID", format!("Invalid {} ID format", entity))
            .with_details(details.to_string())
    }

    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

fn not_found_code(entity_type: &str) -> &'static str {
    match entity_type {
        "Card" => "CARD_NOT_FOUND",
        "Category" => "CATEGORY_NOT_FOUND",
        "Expense" => "EXPENSE_NOT_FOUND",
        _ => "NOT_FOUND",
    }
}

fn in_use_code(entity_type: &str) -> &'static str {
    match entity_type {
        "Card" => "CARD_HAS_EXPENSES",
        "Category" => "CATEGORY_HAS_EXPENSES",
        _ => "CONFLICT",
    }
}

impl From<KakeiboError> for ApiError {
    fn from(err: KakeiboError) -> Self {
        match err {
            KakeiboError::Validation(msg) => {
                Self::bad_request("VALIDATION_ERROR", "Validation failed").with_details(msg)
            }
            KakeiboError::NotFound { entity_type, .. } => Self::new(
                StatusCode::NOT_FOUND,
                not_found_code(entity_type),
                format!("{} not found", entity_type),
            ),
            KakeiboError::Duplicate {
                entity_type,
                identifier,
            } => Self::new(
                StatusCode::CONFLICT,
                if entity_type == "Category" {
                    "DUPLICATE_CATEGORY"
                } else {
                    "DUPLICATE"
                },
                format!("{} name already exists", entity_type),
            )
            .with_details(identifier),
            KakeiboError::InUse { entity_type, .. } => Self::new(
                StatusCode::CONFLICT,
                in_use_code(entity_type),
                format!(
                    "Cannot delete {} with associated expenses",
                    entity_type.to_lowercase()
                ),
            )
            .with_details(format!(
                "Please delete or reassign all expenses using this {} first",
                entity_type.to_lowercase()
            )),
            KakeiboError::InvalidDate(_) => Self::bad_request("INVALID_DATE", "Invalid date format")
                .with_details("Date must be in YYYY-MM-DD or RFC3339 format"),
            KakeiboError::FutureDate(_) => {
                Self::bad_request("FUTURE_DATE", "Expense date cannot be in the future")
                    .with_details("Please select a current or past date")
            }
            other => {
                error!(error = %other, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error",
                )
                .with_details(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("INVALID_REQUEST", "Invalid request body").with_details(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.status.into_response();
        response.extensions_mut().insert(self.body);
        response
    }
}

/// Render [`ApiErrorBody`] extensions into the JSON error envelope
pub async fn render_errors(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(body) = response.extensions().get::<ApiErrorBody>().cloned() else {
        return response;
    };

    let envelope = json!({
        "error": body,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "path": path,
    });
    (response.status(), Json(envelope)).into_response()
}

/// Fallback for unknown routes
pub async fn route_not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "Route not found")
}
