use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::project_service;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectRequest {
    pub notes: Option<String>,
}

/// POST /routes/:id/projects - mark a route as a project
pub async fn add_project(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    body: Option<Json<ProjectRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let notes = body.and_then(|Json(b)| b.notes);
    let pool = DatabaseManager::pool().await?;
    let project =
        project_service::add_project(&pool, user.user_id, route_id, notes.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// DELETE /routes/:id/projects - drop the caller's project mark
pub async fn remove_project(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    project_service::remove_project(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// GET /routes/:id/projects/me - the caller's project mark; absence is not
/// an error
pub async fn my_project(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let project = project_service::get_my_project(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "has_project": project.is_some(), "project": project })))
}
