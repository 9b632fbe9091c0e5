use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::database::models::grade::Grade;
use crate::database::models::hold_color::HoldColor;
use crate::database::models::lane::Lane;
use crate::error::ApiError;

/// Grade codes ordered easiest to hardest.
pub async fn grade_codes(pool: &PgPool) -> Result<Vec<String>, ApiError> {
    let codes: Vec<String> =
        sqlx::query_scalar("SELECT grade FROM grades ORDER BY difficulty_order")
            .fetch_all(pool)
            .await?;
    Ok(codes)
}

pub async fn grade_definitions(pool: &PgPool) -> Result<Vec<Grade>, ApiError> {
    let grades =
        sqlx::query_as::<_, Grade>("SELECT * FROM grades ORDER BY difficulty_order")
            .fetch_all(pool)
            .await?;
    Ok(grades)
}

/// Grade code to display color, for client-side rendering.
pub async fn grade_colors(pool: &PgPool) -> Result<BTreeMap<String, String>, ApiError> {
    let grades = grade_definitions(pool).await?;
    Ok(grades.into_iter().map(|g| (g.grade, g.color)).collect())
}

pub async fn hold_colors(pool: &PgPool) -> Result<Vec<HoldColor>, ApiError> {
    let colors = sqlx::query_as::<_, HoldColor>("SELECT * FROM hold_colors ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(colors)
}

pub async fn lanes(pool: &PgPool) -> Result<Vec<Lane>, ApiError> {
    let lanes = sqlx::query_as::<_, Lane>("SELECT * FROM lanes ORDER BY number")
        .fetch_all(pool)
        .await?;
    Ok(lanes)
}
