use sqlx::PgPool;

use crate::database::assoc;
use crate::database::models::comment::Comment;
use crate::database::models::grade_proposal::GradeProposal;
use crate::database::models::like::{Like, LikeWithRoute};
use crate::database::models::warning::Warning;
use crate::database::refs;
use crate::error::ApiError;

pub async fn like(pool: &PgPool, user_id: i64, route_id: i64) -> Result<Like, ApiError> {
    refs::require_route(pool, route_id).await?;

    if assoc::LIKES.exists(pool, user_id, route_id).await? {
        return Err(ApiError::conflict("Route already liked"));
    }

    // ON CONFLICT DO NOTHING so a concurrent duplicate becomes a Conflict
    // instead of a 500 from the unique index.
    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO likes (user_id, route_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, route_id) DO NOTHING RETURNING id",
    )
    .bind(user_id)
    .bind(route_id)
    .fetch_optional(pool)
    .await?;

    let like_id = inserted.ok_or_else(|| ApiError::conflict("Route already liked"))?;

    let like = sqlx::query_as::<_, Like>(
        "SELECT li.id, li.user_id, u.nickname AS user_name, li.route_id, li.created_at \
         FROM likes li JOIN users u ON u.id = li.user_id WHERE li.id = $1",
    )
    .bind(like_id)
    .fetch_one(pool)
    .await?;

    Ok(like)
}

pub async fn unlike(pool: &PgPool, user_id: i64, route_id: i64) -> Result<(), ApiError> {
    if assoc::LIKES.delete(pool, user_id, route_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Like not found"))
    }
}

pub async fn add_comment(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    content: &str,
) -> Result<Comment, ApiError> {
    refs::require_route(pool, route_id).await?;

    if content.trim().is_empty() {
        return Err(ApiError::validation_error("Comment content cannot be empty"));
    }

    let comment_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO comments (user_id, route_id, content) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(route_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    let comment = sqlx::query_as::<_, Comment>(
        "SELECT c.id, c.user_id, u.nickname AS user_name, c.route_id, c.content, c.created_at \
         FROM comments c JOIN users u ON u.id = c.user_id WHERE c.id = $1",
    )
    .bind(comment_id)
    .fetch_one(pool)
    .await?;

    Ok(comment)
}

/// Insert-or-overwrite the caller's proposal for the route. Returns the
/// proposal and whether it was newly created (vs. an overwrite).
pub async fn propose_grade(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    grade_code: &str,
    reasoning: Option<&str>,
) -> Result<(GradeProposal, bool), ApiError> {
    refs::require_route(pool, route_id).await?;
    let grade = refs::resolve_grade(pool, grade_code).await?;

    // Single write path: xmax = 0 only for freshly inserted rows, which
    // distinguishes 201 from the overwrite case.
    let (proposal_id, created) = sqlx::query_as::<_, (i64, bool)>(
        "INSERT INTO grade_proposals (user_id, route_id, proposed_grade_id, reasoning) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (user_id, route_id) DO UPDATE SET \
             proposed_grade_id = EXCLUDED.proposed_grade_id, \
             reasoning = EXCLUDED.reasoning, \
             updated_at = now() \
         RETURNING id, (xmax = 0)",
    )
    .bind(user_id)
    .bind(route_id)
    .bind(grade.id)
    .bind(reasoning)
    .fetch_one(pool)
    .await?;

    let proposal = fetch_proposal(pool, proposal_id).await?;
    Ok((proposal, created))
}

pub async fn get_my_proposal(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
) -> Result<Option<GradeProposal>, ApiError> {
    let proposal = sqlx::query_as::<_, GradeProposal>(
        "SELECT p.id, p.user_id, u.nickname AS user_name, p.route_id, \
                g.grade AS proposed_grade, p.reasoning, p.created_at, p.updated_at \
         FROM grade_proposals p \
         JOIN users u ON u.id = p.user_id \
         JOIN grades g ON g.id = p.proposed_grade_id \
         WHERE p.user_id = $1 AND p.route_id = $2",
    )
    .bind(user_id)
    .bind(route_id)
    .fetch_optional(pool)
    .await?;

    Ok(proposal)
}

pub async fn add_warning(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    warning_type: &str,
    description: &str,
) -> Result<Warning, ApiError> {
    refs::require_route(pool, route_id).await?;

    if warning_type.trim().is_empty() || description.trim().is_empty() {
        return Err(ApiError::validation_error(
            "warning_type and description are required",
        ));
    }

    let warning_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO warnings (user_id, route_id, warning_type, description) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(route_id)
    .bind(warning_type)
    .bind(description)
    .fetch_one(pool)
    .await?;

    let warning = sqlx::query_as::<_, Warning>(
        "SELECT w.id, w.user_id, u.nickname AS user_name, w.route_id, \
                w.warning_type, w.description, w.status, w.created_at \
         FROM warnings w JOIN users u ON u.id = w.user_id WHERE w.id = $1",
    )
    .bind(warning_id)
    .fetch_one(pool)
    .await?;

    Ok(warning)
}

pub async fn user_likes(pool: &PgPool, user_id: i64) -> Result<Vec<LikeWithRoute>, ApiError> {
    let likes = sqlx::query_as::<_, LikeWithRoute>(
        "SELECT li.id, li.route_id, r.name AS route_name, g.grade AS route_grade, \
                r.wall_section, li.created_at \
         FROM likes li \
         JOIN routes r ON r.id = li.route_id \
         JOIN grades g ON g.id = r.grade_id \
         WHERE li.user_id = $1 ORDER BY li.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(likes)
}

async fn fetch_proposal(pool: &PgPool, proposal_id: i64) -> Result<GradeProposal, ApiError> {
    let proposal = sqlx::query_as::<_, GradeProposal>(
        "SELECT p.id, p.user_id, u.nickname AS user_name, p.route_id, \
                g.grade AS proposed_grade, p.reasoning, p.created_at, p.updated_at \
         FROM grade_proposals p \
         JOIN users u ON u.id = p.user_id \
         JOIN grades g ON g.id = p.proposed_grade_id \
         WHERE p.id = $1",
    )
    .bind(proposal_id)
    .fetch_one(pool)
    .await?;

    Ok(proposal)
}
