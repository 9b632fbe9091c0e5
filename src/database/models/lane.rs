use serde::Serialize;
use sqlx::FromRow;

/// A physical numbered position on the climbing wall.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lane {
    pub id: i64,
    pub number: i32,
    pub name: Option<String>,
    pub is_active: bool,
}
