use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Maintenance warning filed against a route, e.g. broken_hold, safety_issue,
/// needs_cleaning. Status moves through open -> acknowledged -> resolved.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Warning {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub route_id: i64,
    pub warning_type: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
