use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Like {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub route_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A like joined with route details, for the per-user listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LikeWithRoute {
    pub id: i64,
    pub route_id: i64,
    pub route_name: String,
    pub route_grade: String,
    pub wall_section: String,
    pub created_at: DateTime<Utc>,
}
