pub mod auth;

use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::database::manager::DatabaseManager;

/// GET / - service identification
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "crux-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health - liveness plus a database ping
pub async fn health() -> impl IntoResponse {
    let database = match DatabaseManager::health_check().await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };
    Json(json!({ "status": "ok", "database": database }))
}
