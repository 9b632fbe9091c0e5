use sqlx::PgPool;

use crate::database::assoc;
use crate::database::models::project::{Project, ProjectWithRoute};
use crate::database::refs;
use crate::error::ApiError;

/// Mark a route as a project for the user. Rejected when the user has already
/// lead sent the route; duplicate marks are a conflict.
pub async fn add_project(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    notes: Option<&str>,
) -> Result<Project, ApiError> {
    refs::require_route(pool, route_id).await?;

    let lead_sent: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM ticks WHERE user_id = $1 AND route_id = $2 AND lead_send)",
    )
    .bind(user_id)
    .bind(route_id)
    .fetch_one(pool)
    .await?;
    if lead_sent {
        return Err(ApiError::validation_error(
            "Cannot project a route you have already lead sent",
        ));
    }

    let inserted: Option<i64> = sqlx::query_scalar(
        "INSERT INTO projects (user_id, route_id, notes) VALUES ($1, $2, $3) \
         ON CONFLICT (user_id, route_id) DO NOTHING \
         RETURNING id",
    )
    .bind(user_id)
    .bind(route_id)
    .bind(notes)
    .fetch_optional(pool)
    .await?;

    let Some(id) = inserted else {
        return Err(ApiError::conflict("Route is already a project"));
    };

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(project)
}

pub async fn remove_project(pool: &PgPool, user_id: i64, route_id: i64) -> Result<(), ApiError> {
    if assoc::PROJECTS.delete(pool, user_id, route_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Project not found"))
    }
}

pub async fn get_my_project(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
) -> Result<Option<Project>, ApiError> {
    let project =
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE user_id = $1 AND route_id = $2")
            .bind(user_id)
            .bind(route_id)
            .fetch_optional(pool)
            .await?;
    Ok(project)
}

/// The caller's project list, newest first.
pub async fn user_projects(pool: &PgPool, user_id: i64) -> Result<Vec<ProjectWithRoute>, ApiError> {
    let projects = sqlx::query_as::<_, ProjectWithRoute>(
        "SELECT p.id, p.route_id, r.name AS route_name, g.grade AS route_grade, \
                r.wall_section, p.notes, p.created_at, p.updated_at \
         FROM projects p \
         JOIN routes r ON r.id = p.route_id \
         JOIN grades g ON g.id = r.grade_id \
         WHERE p.user_id = $1 \
         ORDER BY p.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(projects)
}
