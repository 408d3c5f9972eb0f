//! Request extractors with envelope-style rejections

use axum::extract::FromRequest;
use uuid::Uuid;

use super::error::ApiError;

/// `axum::Json` whose rejection renders as `INVALID_REQUEST`
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parse a path id, rejecting malformed values with `INVALID_UUID`
pub fn path_id<T: From<Uuid>>(raw: &str, entity: &str) -> Result<T, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(T::from)
        .map_err(|e| ApiError::invalid_uuid(entity, e))
}

/// Parse an id carried in a body or query string
pub fn field_id<T: From<Uuid>>(raw: &str, code: &'static str, entity: &str) -> Result<T, ApiError> {
    Uuid::parse_str(raw.trim()).map(T::from).map_err(|e| {
        ApiError::bad_request(code, format!("Invalid {} ID format", entity)).with_details(e.to_string())
    })
}
