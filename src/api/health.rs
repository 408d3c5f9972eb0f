//! Liveness probe

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use super::AppState;

pub async fn health(State(state): State<AppState>) -> Response {
    if state.storage.is_available() {
        return Json(json!({
            "status": "ok",
            "message": "Kakeibo API is running",
        }))
        .into_response();
    }

    let data_dir = state.storage.paths().data_dir();
    warn!(path = %data_dir.display(), "data directory unavailable");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "status": "error",
            "message": "Storage unavailable",
            "error": format!("data directory {} is not accessible", data_dir.display()),
        })),
    )
        .into_response()
}
