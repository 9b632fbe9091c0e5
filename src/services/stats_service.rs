use std::collections::BTreeMap;

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::ApiError;

/// Aggregated climbing statistics for one user, computed over their full
/// logbook. "Sent" means any send style; per-style figures are broken out
/// separately.
#[derive(Debug, Clone, Serialize)]
pub struct UserStats {
    pub total_ticks: i64,
    pub total_likes: i64,
    pub total_comments: i64,
    pub total_projects: i64,
    pub total_sends: i64,
    pub top_rope_sends: i64,
    pub lead_sends: i64,
    pub total_flashes: i64,
    pub top_rope_flashes: i64,
    pub lead_flashes: i64,
    pub legacy_flashes: i64,
    pub total_attempts: i64,
    pub average_attempts: f64,
    pub sent_wall_sections: Vec<String>,
    pub sent_wall_section_count: i64,
    pub hardest_grade: Option<String>,
    pub hardest_top_rope_grade: Option<String>,
    pub hardest_lead_grade: Option<String>,
    pub achieved_grades: Vec<String>,
}

/// One tick joined with its route's section and grade, the unit the stats
/// computation runs over.
#[derive(Debug, Clone, FromRow)]
pub struct TickStatsRow {
    pub attempts: i32,
    pub top_rope_send: bool,
    pub lead_send: bool,
    pub top_rope_flash: bool,
    pub lead_flash: bool,
    pub flash: bool,
    pub wall_section: String,
    pub grade: String,
    pub difficulty_order: i32,
}

impl TickStatsRow {
    fn sent(&self) -> bool {
        self.top_rope_send || self.lead_send
    }
}

pub async fn get_user_stats(pool: &PgPool, user_id: i64) -> Result<UserStats, ApiError> {
    let rows = sqlx::query_as::<_, TickStatsRow>(
        "SELECT t.attempts, t.top_rope_send, t.lead_send, t.top_rope_flash, \
                t.lead_flash, t.flash, r.wall_section, g.grade, g.difficulty_order \
         FROM ticks t \
         JOIN routes r ON r.id = t.route_id \
         JOIN grades g ON g.id = r.grade_id \
         WHERE t.user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let likes = count_for_user(pool, "likes", user_id).await?;
    let comments = count_for_user(pool, "comments", user_id).await?;
    let projects = count_for_user(pool, "projects", user_id).await?;

    Ok(compute_stats(&rows, likes, comments, projects))
}

async fn count_for_user(pool: &PgPool, table: &str, user_id: i64) -> Result<i64, ApiError> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE user_id = $1");
    let count: i64 = sqlx::query_scalar(&sql).bind(user_id).fetch_one(pool).await?;
    Ok(count)
}

/// Fold the logbook into a stats summary. Grade aggregates only consider
/// sent ticks, per style where the field says so; grades are ordered by
/// difficulty, not lexically.
pub fn compute_stats(
    rows: &[TickStatsRow],
    likes: i64,
    comments: i64,
    projects: i64,
) -> UserStats {
    let total_ticks = rows.len() as i64;
    let total_attempts: i64 = rows.iter().map(|r| i64::from(r.attempts)).sum();

    let count = |pred: fn(&TickStatsRow) -> bool| rows.iter().filter(|r| pred(r)).count() as i64;

    let total_sends = count(TickStatsRow::sent);
    let top_rope_sends = count(|r| r.top_rope_send);
    let lead_sends = count(|r| r.lead_send);
    let total_flashes = count(|r| r.top_rope_flash || r.lead_flash);
    let top_rope_flashes = count(|r| r.top_rope_flash);
    let lead_flashes = count(|r| r.lead_flash);
    let legacy_flashes = count(|r| r.flash);

    let average_attempts = if total_ticks == 0 {
        0.0
    } else {
        (total_attempts as f64 / total_ticks as f64 * 100.0).round() / 100.0
    };

    let mut sent_wall_sections: Vec<String> = rows
        .iter()
        .filter(|r| r.sent())
        .map(|r| r.wall_section.clone())
        .collect();
    sent_wall_sections.sort();
    sent_wall_sections.dedup();
    let sent_wall_section_count = sent_wall_sections.len() as i64;

    let hardest = |pred: fn(&TickStatsRow) -> bool| {
        rows.iter()
            .filter(|r| pred(r))
            .max_by_key(|r| r.difficulty_order)
            .map(|r| r.grade.clone())
    };
    let hardest_grade = hardest(TickStatsRow::sent);
    let hardest_top_rope_grade = hardest(|r| r.top_rope_send);
    let hardest_lead_grade = hardest(|r| r.lead_send);

    // Deduplicate in difficulty order
    let achieved: BTreeMap<i32, &str> = rows
        .iter()
        .filter(|r| r.sent())
        .map(|r| (r.difficulty_order, r.grade.as_str()))
        .collect();
    let achieved_grades = achieved.into_values().map(str::to_string).collect();

    UserStats {
        total_ticks,
        total_likes: likes,
        total_comments: comments,
        total_projects: projects,
        total_sends,
        top_rope_sends,
        lead_sends,
        total_flashes,
        top_rope_flashes,
        lead_flashes,
        legacy_flashes,
        total_attempts,
        average_attempts,
        sent_wall_sections,
        sent_wall_section_count,
        hardest_grade,
        hardest_top_rope_grade,
        hardest_lead_grade,
        achieved_grades,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        attempts: i32,
        top_rope_send: bool,
        lead_send: bool,
        section: &str,
        grade: &str,
        order: i32,
    ) -> TickStatsRow {
        TickStatsRow {
            attempts,
            top_rope_send,
            lead_send,
            top_rope_flash: false,
            lead_flash: false,
            flash: false,
            wall_section: section.to_string(),
            grade: grade.to_string(),
            difficulty_order: order,
        }
    }

    #[test]
    fn test_empty_logbook_yields_zeroes_and_no_grades() {
        let stats = compute_stats(&[], 0, 0, 0);
        assert_eq!(stats.total_ticks, 0);
        assert_eq!(stats.average_attempts, 0.0);
        assert!(stats.hardest_grade.is_none());
        assert!(stats.achieved_grades.is_empty());
        assert!(stats.sent_wall_sections.is_empty());
    }

    #[test]
    fn test_hardest_grades_split_by_style() {
        let rows = vec![
            row(2, true, false, "slab", "6a", 30),
            row(5, false, true, "overhang", "5c", 28),
            row(1, true, true, "cave", "6b", 33),
            // attempted but never sent, must not count
            row(7, false, false, "cave", "7a", 40),
        ];
        let stats = compute_stats(&rows, 0, 0, 0);
        assert_eq!(stats.hardest_grade.as_deref(), Some("6b"));
        assert_eq!(stats.hardest_top_rope_grade.as_deref(), Some("6b"));
        assert_eq!(stats.hardest_lead_grade.as_deref(), Some("6b"));
        assert_eq!(stats.total_sends, 3);
        assert_eq!(stats.top_rope_sends, 2);
        assert_eq!(stats.lead_sends, 2);
    }

    #[test]
    fn test_achieved_grades_are_distinct_and_difficulty_ordered() {
        let rows = vec![
            row(1, true, false, "slab", "6a", 30),
            row(3, false, true, "slab", "5b", 27),
            row(2, true, false, "arete", "6a", 30),
        ];
        let stats = compute_stats(&rows, 0, 0, 0);
        assert_eq!(stats.achieved_grades, vec!["5b", "6a"]);
    }

    #[test]
    fn test_average_attempts_rounds_to_two_decimals() {
        let rows = vec![
            row(1, true, false, "slab", "5a", 22),
            row(2, false, false, "slab", "5a", 22),
            row(2, false, false, "slab", "5a", 22),
        ];
        let stats = compute_stats(&rows, 0, 0, 0);
        assert_eq!(stats.average_attempts, 1.67);
        assert_eq!(stats.total_attempts, 5);
    }

    #[test]
    fn test_sent_wall_sections_deduplicated() {
        let rows = vec![
            row(1, true, false, "slab", "5a", 22),
            row(1, true, false, "slab", "5b", 23),
            row(1, false, true, "cave", "6a", 30),
            row(9, false, false, "roof", "8a", 60),
        ];
        let stats = compute_stats(&rows, 0, 0, 0);
        assert_eq!(stats.sent_wall_sections, vec!["cave", "slab"]);
        assert_eq!(stats.sent_wall_section_count, 2);
    }

    #[test]
    fn test_engagement_counts_pass_through() {
        let stats = compute_stats(&[], 4, 2, 1);
        assert_eq!(stats.total_likes, 4);
        assert_eq!(stats.total_comments, 2);
        assert_eq!(stats.total_projects, 1);
    }
}
