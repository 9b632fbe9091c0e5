use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A user's grade-correction proposal for a route. At most one active
/// proposal per (user, route); re-proposing overwrites it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GradeProposal {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub route_id: i64,
    pub proposed_grade: String,
    pub reasoning: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
