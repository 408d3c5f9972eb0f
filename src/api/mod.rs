//! HTTP API
//!
//! JSON endpoints for cards, categories, expenses and reports. Every handler
//! goes through the same services the CLI uses.

pub mod cards;
pub mod categories;
pub mod error;
pub mod expenses;
pub mod extract;
pub mod health;
pub mod reports;
pub mod response;

pub use error::{ApiError, ApiErrorBody};

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderValue, Method};
use axum::middleware::{from_fn, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::storage::Storage;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    /// Default expense page size
    pub page_size: usize,
    /// Held for the duration of every mutation
    pub writes: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(storage: Storage, settings: &Settings) -> Self {
        Self {
            storage: Arc::new(storage),
            page_size: settings.page_size,
            writes: Arc::new(Mutex::new(())),
        }
    }
}

/// Build the application router
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/cards", get(cards::list).post(cards::create))
        .route(
            "/cards/:id",
            get(cards::get).put(cards::update).delete(cards::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/:id",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/reports/monthly", get(reports::monthly))
        .route("/reports/yearly", get(reports::yearly));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .fallback(error::route_not_found)
        .layer(from_fn(error::render_errors))
        .layer(from_fn(log_requests))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// One line per request: method, path, status and latency
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "[{}] {} {} {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Bind `address` and serve until the process is stopped
pub async fn serve(state: AppState, settings: &Settings, address: &str) -> anyhow::Result<()> {
    let app = router(state, &settings.server.allowed_origins);
    let listener = TcpListener::bind(address).await?;
    info!(address = %listener.local_addr()?, "kakeibo API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::KakeiboPaths;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app() -> (TempDir, Router) {
        let temp_dir = TempDir::new().unwrap();
        let paths = KakeiboPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        let state = AppState::new(storage, &Settings::default());
        (temp_dir, router(state, &[]))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = axum::http::Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_card(app: &Router, name: &str) -> String {
        let (status, body) = send(app, "POST", "/api/cards", Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn create_category(app: &Router, name: &str, shared: bool) -> String {
        let (status, body) = send(
            app,
            "POST",
            "/api/categories",
            Some(json!({ "name": name, "isShared": shared })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let (_temp, app) = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Kakeibo API is running");
    }

    #[tokio::test]
    async fn test_card_lifecycle() {
        let (_temp, app) = test_app();

        let (status, body) = send(&app, "GET", "/api/cards", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));

        let id = create_card(&app, "Visa").await;

        let (status, body) = send(&app, "GET", &format!("/api/cards/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Card retrieved successfully");
        assert_eq!(body["data"]["name"], "Visa");
        assert_eq!(body["data"]["color"], "#3B82F6");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/api/cards/{}", id),
            Some(json!({ "name": "Amex", "color": "#FF0000" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Amex");
        assert_eq!(body["data"]["color"], "#FF0000");

        let (status, body) = send(&app, "DELETE", &format!("/api/cards/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Card deleted successfully");
        assert!(body.get("data").is_none());

        let (status, body) = send(&app, "GET", &format!("/api/cards/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "CARD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let (_temp, app) = test_app();

        let (status, body) = send(&app, "GET", "/api/cards/invalid-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_UUID");
        assert_eq!(body["path"], "/api/cards/invalid-uuid");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

        let (status, body) = send(&app, "POST", "/api/cards", Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

        let (status, body) = send(&app, "GET", "/api/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_malformed_json_body() {
        let (_temp, app) = test_app();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/cards")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_duplicate_category_conflict() {
        let (_temp, app) = test_app();
        create_category(&app, "Groceries", true).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/categories",
            Some(json!({ "name": "groceries" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "DUPLICATE_CATEGORY");
    }

    #[tokio::test]
    async fn test_expense_flow_and_delete_guards() {
        let (_temp, app) = test_app();
        let card = create_card(&app, "Visa").await;
        let category = create_category(&app, "Groceries", true).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({
                "amount": 1500,
                "date": "2024-01-15",
                "description": "Weekly shop",
                "cardId": card,
                "categoryId": category,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["card"]["name"], "Visa");
        assert_eq!(body["data"]["category"]["isShared"], true);
        let expense_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, "GET", "/api/expenses?limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["totalItems"], 1);
        assert_eq!(body["pagination"]["limit"], 10);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = send(&app, "DELETE", &format!("/api/cards/{}", card), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CARD_HAS_EXPENSES");

        let (status, body) = send(
            &app,
            "DELETE",
            &format!("/api/categories/{}", category),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CATEGORY_HAS_EXPENSES");

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/expenses/{}", expense_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, "DELETE", &format!("/api/cards/{}", card), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_expense_list_huge_page() {
        let (_temp, app) = test_app();
        let uri = format!("/api/expenses?page={}", usize::MAX);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["pagination"]["totalItems"], 0);
    }

    #[tokio::test]
    async fn test_expense_references_must_exist() {
        let (_temp, app) = test_app();
        let category = create_category(&app, "Groceries", false).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/expenses",
            Some(json!({
                "amount": 10,
                "date": "2024-01-15",
                "cardId": "550e8400-e29b-41d4-a716-446655440000",
                "categoryId": category,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "CARD_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_monthly_report_split() {
        let (_temp, app) = test_app();
        let card = create_card(&app, "Visa").await;
        let shared = create_category(&app, "Rent", true).await;
        let personal = create_category(&app, "Hobby", false).await;

        for (amount, category) in [(1000, &shared), (300, &personal)] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/expenses",
                Some(json!({
                    "amount": amount,
                    "date": "2024-03-10",
                    "cardId": card,
                    "categoryId": category,
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) =
            send(&app, "GET", "/api/reports/monthly?year=2024&month=3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Monthly report generated successfully");
        assert_eq!(body["data"]["totalAmount"], 1300);
        assert_eq!(body["data"]["sharedExpenses"]["totalSharedAmount"], 1000);
        assert_eq!(body["data"]["sharedExpenses"]["splitAmount"], 500);

        let (status, body) = send(&app, "GET", "/api/reports/yearly?year=1999", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_YEAR");
    }
}
