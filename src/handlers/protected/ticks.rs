use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::database::models::tick::{SendStyle, TickPatch};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::tick_service;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub style: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AttemptsRequest {
    pub attempts: Option<i32>,
    pub notes: Option<String>,
}

/// POST /routes/:id/ticks - create or patch the caller's tick
pub async fn upsert_tick(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<TickPatch>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let (tick, created) = tick_service::upsert_tick(&pool, user.user_id, route_id, &body).await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(tick)))
}

/// POST /routes/:id/send - record a send in a given style
pub async fn mark_send(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<SendRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Parsed by hand so an unknown style gets the same structured error as a
    // missing one
    let style = body
        .style
        .as_deref()
        .and_then(SendStyle::parse)
        .ok_or_else(|| {
            ApiError::validation_error_with_options(
                "Missing or invalid send style",
                SendStyle::VALID.iter().map(|s| s.to_string()).collect(),
            )
        })?;

    let pool = DatabaseManager::pool().await?;
    let (tick, created) =
        tick_service::mark_send(&pool, user.user_id, route_id, style, body.notes.as_deref())
            .await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(tick)))
}

/// POST /routes/:id/attempts - log attempts without touching send flags
pub async fn add_attempts(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<AttemptsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let attempts = body.attempts.unwrap_or(1);
    let pool = DatabaseManager::pool().await?;
    let (tick, created) =
        tick_service::add_attempts(&pool, user.user_id, route_id, attempts, body.notes.as_deref())
            .await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(tick)))
}

/// DELETE /routes/:id/ticks - remove the caller's tick
pub async fn remove_tick(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    tick_service::remove_tick(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// GET /routes/:id/ticks/me - the caller's tick; absence is not an error
pub async fn my_tick(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let tick = tick_service::get_my_tick(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "has_tick": tick.is_some(), "tick": tick })))
}
