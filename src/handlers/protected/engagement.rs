use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::engagement_service;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GradeProposalRequest {
    pub grade: Option<String>,
    pub reasoning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WarningRequest {
    pub warning_type: Option<String>,
    pub description: Option<String>,
}

/// POST /routes/:id/like - like a route once
pub async fn like_route(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let like = engagement_service::like(&pool, user.user_id, route_id).await?;
    Ok((StatusCode::CREATED, Json(like)))
}

/// DELETE /routes/:id/like - remove the caller's like
pub async fn unlike_route(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    engagement_service::unlike(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

/// POST /routes/:id/comments - append a comment
pub async fn add_comment(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<CommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = body.content.unwrap_or_default();
    let pool = DatabaseManager::pool().await?;
    let comment = engagement_service::add_comment(&pool, user.user_id, route_id, &content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// POST /routes/:id/grade-proposals - propose a grade, overwriting any
/// earlier proposal from the same user
pub async fn propose_grade(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<GradeProposalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let grade = body
        .grade
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .ok_or_else(|| ApiError::validation_error("Missing required field: grade"))?;

    let pool = DatabaseManager::pool().await?;
    let (proposal, created) =
        engagement_service::propose_grade(&pool, user.user_id, route_id, grade, body.reasoning.as_deref())
            .await?;
    let status = if created { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(proposal)))
}

/// GET /routes/:id/grade-proposals/me - the caller's proposal, if any
pub async fn my_grade_proposal(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let proposal = engagement_service::get_my_proposal(&pool, user.user_id, route_id).await?;
    Ok(Json(json!({ "has_proposal": proposal.is_some(), "proposal": proposal })))
}

/// POST /routes/:id/warnings - report a problem with a route
pub async fn add_warning(
    Extension(user): Extension<AuthUser>,
    Path(route_id): Path<i64>,
    Json(body): Json<WarningRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let warning_type = body.warning_type.unwrap_or_default();
    let description = body.description.unwrap_or_default();
    let pool = DatabaseManager::pool().await?;
    let warning =
        engagement_service::add_warning(&pool, user.user_id, route_id, &warning_type, &description)
            .await?;
    Ok((StatusCode::CREATED, Json(warning)))
}
