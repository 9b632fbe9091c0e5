use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HoldColor {
    pub id: i64,
    pub name: String,
    pub hex_code: String,
}
