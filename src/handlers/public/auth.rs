use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{self, Claims};
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::services::user_service;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

fn required(value: &Option<String>, field: &str) -> Result<String, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::validation_error(format!("Missing required field: {field}")))
}

/// POST /auth/register - create an account and return a signed token
pub async fn register(Json(body): Json<RegisterRequest>) -> Result<impl IntoResponse, ApiError> {
    let username = required(&body.username, "username")?;
    let nickname = required(&body.nickname, "nickname")?;
    let email = required(&body.email, "email")?;
    let password = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation_error("Missing required field: password"))?;

    let pool = DatabaseManager::pool().await?;
    let user = user_service::register(&pool, &username, &nickname, &email, password).await?;
    let token = auth::generate_token(&Claims::new(user.id, user.username.clone()))?;

    Ok((StatusCode::CREATED, Json(json!({ "token": token, "user": user }))))
}

/// POST /auth/login - exchange credentials for a token
pub async fn login(Json(body): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let username = required(&body.username, "username")?;
    let password = body
        .password
        .as_deref()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::validation_error("Missing required field: password"))?;

    let pool = DatabaseManager::pool().await?;
    let user = user_service::login(&pool, &username, password).await?;
    let token = auth::generate_token(&Claims::new(user.id, user.username.clone()))?;

    Ok(Json(json!({ "token": token, "user": user })))
}
