use axum::response::IntoResponse;
use axum::Json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::services::{reference_service, route_service};

/// GET /wall-sections - distinct wall sections of existing routes
pub async fn wall_sections() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(route_service::wall_sections(&pool).await?))
}

/// GET /grades - grade codes ordered easiest to hardest
pub async fn grades() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(reference_service::grade_codes(&pool).await?))
}

/// GET /grade-definitions - full grade rows
pub async fn grade_definitions() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(reference_service::grade_definitions(&pool).await?))
}

/// GET /grade-colors - grade code to display color
pub async fn grade_colors() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(reference_service::grade_colors(&pool).await?))
}

/// GET /hold-colors - available hold colors
pub async fn hold_colors() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(reference_service::hold_colors(&pool).await?))
}

/// GET /lanes - lanes ordered by number
pub async fn lanes() -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(reference_service::lanes(&pool).await?))
}
