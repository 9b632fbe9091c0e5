use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::{engagement_service, project_service, stats_service, tick_service, user_service};

#[derive(Debug, Deserialize)]
pub struct NicknameRequest {
    pub nickname: Option<String>,
}

/// GET /auth/me - the caller's profile
pub async fn me(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let profile = user_service::get(&pool, user.user_id).await?;
    Ok(Json(profile))
}

/// PUT /user/nickname - change display name, registration rules apply
pub async fn set_nickname(
    Extension(user): Extension<AuthUser>,
    Json(body): Json<NicknameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let nickname = body
        .nickname
        .ok_or_else(|| ApiError::validation_error("Missing required field: nickname"))?;
    let pool = DatabaseManager::pool().await?;
    let profile = user_service::set_nickname(&pool, user.user_id, &nickname).await?;
    Ok(Json(profile))
}

/// GET /user/ticks - the caller's logbook
pub async fn my_ticks(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(tick_service::user_ticks(&pool, user.user_id).await?))
}

/// GET /user/likes - the caller's liked routes
pub async fn my_likes(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(engagement_service::user_likes(&pool, user.user_id).await?))
}

/// GET /user/projects - the caller's project list
pub async fn my_projects(
    Extension(user): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(project_service::user_projects(&pool, user.user_id).await?))
}

/// GET /user/stats - aggregated climbing statistics
pub async fn my_stats(Extension(user): Extension<AuthUser>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    Ok(Json(stats_service::get_user_stats(&pool, user.user_id).await?))
}
