//! HTTP routes of the inventory API.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Session check, 401 without a signed-in user |
//! | `GET`  | `/items?query=&startCursor=` | Page of items matching a search term |
//! | `GET`  | `/items/{id}?startCursor=` | Items with the given internal code |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Upstream failures on the item routes are answered with
//! `500 {"error": "<message>"}`. A lookup that matches nothing answers
//! `200 {"error": "No se encontró ese objeto"}`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clerk_auth::SessionVerifier;
use crate::error::{AppError, AppResult};
use crate::middleware::{AuthLayer, AuthenticatedUser};
use crate::models::{ItemLookup, ItemPage, NotFoundBody};
use crate::services::ItemsService;

#[derive(Clone)]
struct AppState {
    items: ItemsService,
}

/// Builds the application router with CORS, tracing and session layers.
pub fn router(
    items: ItemsService,
    verifier: Arc<dyn SessionVerifier>,
    frontend_url: &str,
) -> AppResult<Router> {
    let cors = cors_layer(frontend_url)?;

    // Only the session check verifies tokens; item routes never wait on the provider.
    let session = Router::new()
        .route("/", get(handle_root))
        .route_layer(AuthLayer::new(verifier));

    Ok(Router::new()
        .route("/items", get(handle_list_items))
        .route("/items/{id}", get(handle_get_item))
        .route("/health", get(handle_health))
        .with_state(AppState { items })
        .merge(session)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Only the configured frontend origin may make credentialed requests.
fn cors_layer(frontend_url: &str) -> AppResult<CorsLayer> {
    let origin = HeaderValue::from_str(frontend_url)
        .map_err(|e| AppError::Config(format!("Invalid FRONTEND_URL: {}", e)))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

// ============ GET / ============

async fn handle_root(user: Option<Extension<AuthenticatedUser>>) -> Response {
    match user {
        Some(Extension(user)) => Json(json!({
            "message": "Bienvenido a la API de inventario.",
            "user": { "id": user.user_id },
        }))
        .into_response(),
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Por favor inicia sesión." })),
        )
            .into_response(),
    }
}

// ============ GET /items ============

#[derive(Debug, Deserialize)]
struct ListParams {
    query: Option<String>,
    #[serde(rename = "startCursor")]
    start_cursor: Option<String>,
}

async fn handle_list_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ItemPage>, AppError> {
    let page = state
        .items
        .list_items(params.query.as_deref(), params.start_cursor.as_deref())
        .await?;
    Ok(Json(page))
}

// ============ GET /items/{id} ============

#[derive(Debug, Deserialize)]
struct CursorParams {
    #[serde(rename = "startCursor")]
    start_cursor: Option<String>,
}

async fn handle_get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CursorParams>,
) -> Result<Response, AppError> {
    let lookup = state
        .items
        .find_item(&id, params.start_cursor.as_deref())
        .await?;

    Ok(match lookup {
        ItemLookup::Found(page) => Json(page).into_response(),
        ItemLookup::NotFound => Json(NotFoundBody::default()).into_response(),
    })
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
