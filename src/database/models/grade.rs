use serde::Serialize;
use sqlx::FromRow;

/// One entry of the French grade scale. `difficulty_order` is a total order:
/// higher means harder.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Grade {
    pub id: i64,
    pub grade: String,
    pub difficulty_order: i32,
    pub color: String,
}
