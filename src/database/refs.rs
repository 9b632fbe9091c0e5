//! Natural-key resolution for the reference catalogs. Route creation and
//! update take grade codes, hold color names and lane numbers from clients;
//! these lookups turn them into rows and produce a validation error carrying
//! the list of valid options when the key does not resolve.

use sqlx::PgPool;

use crate::database::models::{grade::Grade, hold_color::HoldColor, lane::Lane};
use crate::error::ApiError;

pub async fn resolve_grade(pool: &PgPool, code: &str) -> Result<Grade, ApiError> {
    let grade = sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE grade = $1")
        .bind(code)
        .fetch_optional(pool)
        .await?;

    match grade {
        Some(grade) => Ok(grade),
        None => {
            let options =
                sqlx::query_scalar::<_, String>("SELECT grade FROM grades ORDER BY difficulty_order")
                    .fetch_all(pool)
                    .await?;
            Err(ApiError::validation_error_with_options(
                format!("Invalid grade '{}'", code),
                options,
            ))
        }
    }
}

pub async fn resolve_hold_color(pool: &PgPool, name: &str) -> Result<HoldColor, ApiError> {
    let color = sqlx::query_as::<_, HoldColor>("SELECT * FROM hold_colors WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;

    match color {
        Some(color) => Ok(color),
        None => {
            let options =
                sqlx::query_scalar::<_, String>("SELECT name FROM hold_colors ORDER BY name")
                    .fetch_all(pool)
                    .await?;
            Err(ApiError::validation_error_with_options(
                format!("Invalid hold color '{}'", name),
                options,
            ))
        }
    }
}

pub async fn resolve_lane(pool: &PgPool, number: i32) -> Result<Lane, ApiError> {
    let lane = sqlx::query_as::<_, Lane>("SELECT * FROM lanes WHERE number = $1")
        .bind(number)
        .fetch_optional(pool)
        .await?;

    match lane {
        Some(lane) => Ok(lane),
        None => {
            let options = sqlx::query_scalar::<_, i32>("SELECT number FROM lanes ORDER BY number")
                .fetch_all(pool)
                .await?;
            Err(ApiError::validation_error_with_options(
                format!("Invalid lane {}", number),
                options.into_iter().map(|n| n.to_string()).collect(),
            ))
        }
    }
}

/// 404 guard used before writing child rows of a route.
pub async fn require_route(pool: &PgPool, route_id: i64) -> Result<(), ApiError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM routes WHERE id = $1)")
        .bind(route_id)
        .fetch_one(pool)
        .await?;

    if exists {
        Ok(())
    } else {
        Err(ApiError::not_found(format!("Route {} not found", route_id)))
    }
}
