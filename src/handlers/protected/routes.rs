use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::database::manager::DatabaseManager;
use crate::database::models::route::{NewRoute, RoutePatch};
use crate::error::ApiError;
use crate::services::route_service::{self, RouteFilters};

#[derive(Debug, Default, Deserialize)]
pub struct RouteListQuery {
    pub wall_section: Option<String>,
    pub grade: Option<String>,
    pub lane: Option<i32>,
}

/// GET /routes - list routes with resolved reference data and child counts
pub async fn list_routes(
    Query(query): Query<RouteListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let filters = RouteFilters {
        wall_section: query.wall_section,
        grade: query.grade,
        lane: query.lane,
    };
    let routes = route_service::list(&pool, &filters).await?;
    Ok(Json(routes))
}

/// GET /routes/:id - full route detail with nested engagement lists
pub async fn get_route(Path(route_id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let detail = route_service::get_detail(&pool, route_id).await?;
    Ok(Json(detail))
}

/// POST /routes - create a route from natural keys (grade code, lane number,
/// hold color name)
pub async fn create_route(Json(body): Json<NewRoute>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let route = route_service::create(&pool, &body).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

/// PUT /routes/:id - partial update with the same natural-key resolution
pub async fn update_route(
    Path(route_id): Path<i64>,
    Json(body): Json<RoutePatch>,
) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let route = route_service::update(&pool, route_id, &body).await?;
    Ok(Json(route))
}

/// DELETE /routes/:id - remove a route and all its child rows
pub async fn delete_route(Path(route_id): Path<i64>) -> Result<impl IntoResponse, ApiError> {
    let pool = DatabaseManager::pool().await?;
    route_service::delete(&pool, route_id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}
