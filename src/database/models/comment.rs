use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub route_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
