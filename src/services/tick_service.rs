use sqlx::{PgPool, Postgres, Transaction};

use crate::database::assoc;
use crate::database::models::tick::{SendStyle, Tick, TickPatch, TickValues, TickWithRoute};
use crate::database::refs;
use crate::error::ApiError;

/// Apply a client patch to the caller's tick for the route, creating the row
/// if absent. Runs in one transaction: a lead send recorded here also removes
/// any project row for the pair, and any failure rolls the whole write back.
/// Returns the tick and whether the row was newly created.
pub async fn upsert_tick(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    patch: &TickPatch,
) -> Result<(Tick, bool), ApiError> {
    if let Some(add) = patch.add_attempts {
        if add < 1 {
            return Err(ApiError::validation_error("add_attempts must be at least 1"));
        }
    }
    if let Some(attempts) = patch.attempts {
        if attempts < 0 {
            return Err(ApiError::validation_error("attempts cannot be negative"));
        }
    }

    refs::require_route(pool, route_id).await?;

    let mut tx = pool.begin().await?;
    let existing = fetch_for_update(&mut tx, user_id, route_id).await?;
    let created = existing.is_none();

    let mut values = existing.map(|t| t.values()).unwrap_or_default();
    values.apply_patch(patch);

    let tick = write_values(&mut tx, user_id, route_id, &values).await?;

    // A lead-sent route cannot remain a project
    if tick.lead_send {
        assoc::PROJECTS.delete(&mut *tx, user_id, route_id).await?;
    }

    tx.commit().await?;
    Ok((tick, created))
}

/// Record a send in the given style, creating the tick with attempts = 1 if
/// absent. A first-attempt send also sets the style flash and the legacy
/// flash flag; lead sends drop any project row.
pub async fn mark_send(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    style: SendStyle,
    notes: Option<&str>,
) -> Result<(Tick, bool), ApiError> {
    refs::require_route(pool, route_id).await?;

    let mut tx = pool.begin().await?;
    let existing = fetch_for_update(&mut tx, user_id, route_id).await?;
    let created = existing.is_none();

    let mut values = existing.map(|t| t.values()).unwrap_or(TickValues {
        attempts: 1,
        ..Default::default()
    });
    values.apply_send(style, notes);

    let tick = write_values(&mut tx, user_id, route_id, &values).await?;

    if style == SendStyle::Lead {
        assoc::PROJECTS.delete(&mut *tx, user_id, route_id).await?;
    }

    tx.commit().await?;
    Ok((tick, created))
}

/// Log extra attempts without touching any send/flash flag.
pub async fn add_attempts(
    pool: &PgPool,
    user_id: i64,
    route_id: i64,
    attempts: i32,
    notes: Option<&str>,
) -> Result<(Tick, bool), ApiError> {
    if attempts < 1 {
        return Err(ApiError::validation_error("attempts must be at least 1"));
    }

    refs::require_route(pool, route_id).await?;

    let mut tx = pool.begin().await?;
    let existing = fetch_for_update(&mut tx, user_id, route_id).await?;
    let created = existing.is_none();

    let mut values = existing.map(|t| t.values()).unwrap_or_default();
    values.attempts += attempts;
    if let Some(notes) = notes {
        values.notes = Some(notes.to_string());
    }

    let tick = write_values(&mut tx, user_id, route_id, &values).await?;
    tx.commit().await?;
    Ok((tick, created))
}

pub async fn remove_tick(pool: &PgPool, user_id: i64, route_id: i64) -> Result<(), ApiError> {
    if assoc::TICKS.delete(pool, user_id, route_id).await? {
        Ok(())
    } else {
        Err(ApiError::not_found("Tick not found"))
    }
}

/// The caller's tick for the route, or None. Absence is a valid state, never
/// an error.
pub async fn get_my_tick(pool: &PgPool, user_id: i64, route_id: i64) -> Result<Option<Tick>, ApiError> {
    let tick = sqlx::query_as::<_, Tick>("SELECT * FROM ticks WHERE user_id = $1 AND route_id = $2")
        .bind(user_id)
        .bind(route_id)
        .fetch_optional(pool)
        .await?;
    Ok(tick)
}

/// The caller's full logbook, newest first.
pub async fn user_ticks(pool: &PgPool, user_id: i64) -> Result<Vec<TickWithRoute>, ApiError> {
    let ticks = sqlx::query_as::<_, TickWithRoute>(
        "SELECT t.*, r.name AS route_name, g.grade AS route_grade, r.wall_section \
         FROM ticks t \
         JOIN routes r ON r.id = t.route_id \
         JOIN grades g ON g.id = r.grade_id \
         WHERE t.user_id = $1 \
         ORDER BY t.updated_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ticks)
}

async fn fetch_for_update(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    route_id: i64,
) -> Result<Option<Tick>, ApiError> {
    let tick = sqlx::query_as::<_, Tick>(
        "SELECT * FROM ticks WHERE user_id = $1 AND route_id = $2 FOR UPDATE",
    )
    .bind(user_id)
    .bind(route_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(tick)
}

/// The single write path for tick rows: insert-or-update on the
/// (user, route) key.
async fn write_values(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i64,
    route_id: i64,
    values: &TickValues,
) -> Result<Tick, ApiError> {
    let tick = sqlx::query_as::<_, Tick>(
        "INSERT INTO ticks (user_id, route_id, attempts, top_rope_send, lead_send, \
                            top_rope_flash, lead_flash, flash, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (user_id, route_id) DO UPDATE SET \
             attempts = EXCLUDED.attempts, \
             top_rope_send = EXCLUDED.top_rope_send, \
             lead_send = EXCLUDED.lead_send, \
             top_rope_flash = EXCLUDED.top_rope_flash, \
             lead_flash = EXCLUDED.lead_flash, \
             flash = EXCLUDED.flash, \
             notes = EXCLUDED.notes, \
             updated_at = now() \
         RETURNING *",
    )
    .bind(user_id)
    .bind(route_id)
    .bind(values.attempts)
    .bind(values.top_rope_send)
    .bind(values.lead_send)
    .bind(values.top_rope_flash)
    .bind(values.lead_flash)
    .bind(values.flash)
    .bind(values.notes.as_deref())
    .fetch_one(&mut **tx)
    .await?;

    Ok(tick)
}
