use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A route a user is working on. Cannot coexist with a lead-send tick for the
/// same (user, route); recording a lead send removes the project row.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub user_id: i64,
    pub route_id: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A project joined with route details, for the per-user listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProjectWithRoute {
    pub id: i64,
    pub route_id: i64,
    pub route_name: String,
    pub route_grade: String,
    pub wall_section: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
