use sqlx::PgPool;

use crate::database::models::comment::Comment;
use crate::database::models::grade_proposal::GradeProposal;
use crate::database::models::like::Like;
use crate::database::models::route::{NewRoute, RouteDetail, RoutePatch, RouteSummary};
use crate::database::models::warning::Warning;
use crate::database::refs;
use crate::error::ApiError;

/// Listing filters; all are equality matches on natural keys.
#[derive(Debug, Default)]
pub struct RouteFilters {
    pub wall_section: Option<String>,
    pub grade: Option<String>,
    pub lane: Option<i32>,
}

// Natural keys resolved to display values, child counts computed at read
// time. Kept as one statement so listing and detail stay consistent.
const SUMMARY_SELECT: &str = "SELECT r.id, r.name, g.grade AS grade, g.color AS grade_color, \
       r.route_setter, r.wall_section, \
       l.number AS lane, l.name AS lane_name, \
       hc.name AS hold_color, hc.hex_code AS hold_color_hex, \
       r.description, r.created_at, \
       (SELECT COUNT(*) FROM likes WHERE route_id = r.id) AS likes_count, \
       (SELECT COUNT(*) FROM comments WHERE route_id = r.id) AS comments_count, \
       (SELECT COUNT(*) FROM grade_proposals WHERE route_id = r.id) AS grade_proposals_count, \
       (SELECT COUNT(*) FROM warnings WHERE route_id = r.id) AS warnings_count, \
       (SELECT COUNT(*) FROM ticks WHERE route_id = r.id) AS ticks_count, \
       (SELECT COUNT(*) FROM projects WHERE route_id = r.id) AS projects_count \
 FROM routes r \
 JOIN grades g ON g.id = r.grade_id \
 JOIN lanes l ON l.id = r.lane_id \
 LEFT JOIN hold_colors hc ON hc.id = r.hold_color_id";

pub async fn list(pool: &PgPool, filters: &RouteFilters) -> Result<Vec<RouteSummary>, ApiError> {
    let sql = format!(
        "{} WHERE ($1::text IS NULL OR r.wall_section = $1) \
           AND ($2::text IS NULL OR g.grade = $2) \
           AND ($3::int4 IS NULL OR l.number = $3) \
         ORDER BY r.created_at DESC",
        SUMMARY_SELECT
    );

    let routes = sqlx::query_as::<_, RouteSummary>(&sql)
        .bind(filters.wall_section.as_deref())
        .bind(filters.grade.as_deref())
        .bind(filters.lane)
        .fetch_all(pool)
        .await?;

    Ok(routes)
}

pub async fn get_summary(pool: &PgPool, route_id: i64) -> Result<RouteSummary, ApiError> {
    let sql = format!("{} WHERE r.id = $1", SUMMARY_SELECT);

    sqlx::query_as::<_, RouteSummary>(&sql)
        .bind(route_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Route {} not found", route_id)))
}

pub async fn get_detail(pool: &PgPool, route_id: i64) -> Result<RouteDetail, ApiError> {
    let route = get_summary(pool, route_id).await?;

    let likes = sqlx::query_as::<_, Like>(
        "SELECT li.id, li.user_id, u.nickname AS user_name, li.route_id, li.created_at \
         FROM likes li JOIN users u ON u.id = li.user_id \
         WHERE li.route_id = $1 ORDER BY li.created_at",
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT c.id, c.user_id, u.nickname AS user_name, c.route_id, c.content, c.created_at \
         FROM comments c JOIN users u ON u.id = c.user_id \
         WHERE c.route_id = $1 ORDER BY c.created_at",
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    let grade_proposals = sqlx::query_as::<_, GradeProposal>(
        "SELECT p.id, p.user_id, u.nickname AS user_name, p.route_id, \
                g.grade AS proposed_grade, p.reasoning, p.created_at, p.updated_at \
         FROM grade_proposals p \
         JOIN users u ON u.id = p.user_id \
         JOIN grades g ON g.id = p.proposed_grade_id \
         WHERE p.route_id = $1 ORDER BY p.created_at",
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    let warnings = sqlx::query_as::<_, Warning>(
        "SELECT w.id, w.user_id, u.nickname AS user_name, w.route_id, \
                w.warning_type, w.description, w.status, w.created_at \
         FROM warnings w JOIN users u ON u.id = w.user_id \
         WHERE w.route_id = $1 ORDER BY w.created_at",
    )
    .bind(route_id)
    .fetch_all(pool)
    .await?;

    Ok(RouteDetail {
        route,
        likes,
        comments,
        grade_proposals,
        warnings,
    })
}

pub async fn create(pool: &PgPool, new_route: &NewRoute) -> Result<RouteSummary, ApiError> {
    let name = required(&new_route.name, "name")?;
    let grade_code = required(&new_route.grade, "grade")?;
    let route_setter = required(&new_route.route_setter, "route_setter")?;
    let wall_section = required(&new_route.wall_section, "wall_section")?;
    let lane_number = new_route
        .lane
        .ok_or_else(|| ApiError::validation_error("Missing required field: lane"))?;

    let grade = refs::resolve_grade(pool, grade_code).await?;
    let lane = refs::resolve_lane(pool, lane_number).await?;
    let hold_color_id = match new_route.color.as_deref() {
        Some(color) => Some(refs::resolve_hold_color(pool, color).await?.id),
        None => None,
    };

    let route_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO routes (name, grade_id, route_setter, wall_section, lane_id, hold_color_id, description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(name)
    .bind(grade.id)
    .bind(route_setter)
    .bind(wall_section)
    .bind(lane.id)
    .bind(hold_color_id)
    .bind(new_route.description.as_deref())
    .fetch_one(pool)
    .await?;

    get_summary(pool, route_id).await
}

/// Partial update; only provided fields change, natural keys resolved the
/// same way as on create.
pub async fn update(pool: &PgPool, route_id: i64, patch: &RoutePatch) -> Result<RouteSummary, ApiError> {
    refs::require_route(pool, route_id).await?;

    let grade_id = match patch.grade.as_deref() {
        Some(code) => Some(refs::resolve_grade(pool, code).await?.id),
        None => None,
    };
    let lane_id = match patch.lane {
        Some(number) => Some(refs::resolve_lane(pool, number).await?.id),
        None => None,
    };
    // Explicit null clears the nullable columns; an absent field leaves them
    let hold_color_id = match patch.color.as_ref() {
        None => None,
        Some(None) => Some(None),
        Some(Some(name)) => Some(Some(refs::resolve_hold_color(pool, name).await?.id)),
    };

    sqlx::query(
        "UPDATE routes SET \
             name = COALESCE($2, name), \
             grade_id = COALESCE($3, grade_id), \
             route_setter = COALESCE($4, route_setter), \
             wall_section = COALESCE($5, wall_section), \
             lane_id = COALESCE($6, lane_id), \
             hold_color_id = CASE WHEN $7 THEN $8 ELSE hold_color_id END, \
             description = CASE WHEN $9 THEN $10 ELSE description END \
         WHERE id = $1",
    )
    .bind(route_id)
    .bind(patch.name.as_deref())
    .bind(grade_id)
    .bind(patch.route_setter.as_deref())
    .bind(patch.wall_section.as_deref())
    .bind(lane_id)
    .bind(hold_color_id.is_some())
    .bind(hold_color_id.flatten())
    .bind(patch.description.is_some())
    .bind(patch.description.clone().flatten())
    .execute(pool)
    .await?;

    get_summary(pool, route_id).await
}

/// Delete a route; child rows cascade at the storage layer.
pub async fn delete(pool: &PgPool, route_id: i64) -> Result<(), ApiError> {
    let result = sqlx::query("DELETE FROM routes WHERE id = $1")
        .bind(route_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found(format!("Route {} not found", route_id)));
    }
    Ok(())
}

pub async fn wall_sections(pool: &PgPool) -> Result<Vec<String>, ApiError> {
    let sections = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT wall_section FROM routes \
         WHERE wall_section <> '' ORDER BY wall_section",
    )
    .fetch_all(pool)
    .await?;
    Ok(sections)
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    match field.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::validation_error(format!(
            "Missing required field: {}",
            name
        ))),
    }
}
