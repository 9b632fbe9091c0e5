use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{comment::Comment, grade_proposal::GradeProposal, like::Like, warning::Warning};

/// Listing/summary serialization of a route: natural keys resolved to their
/// display values, child-row counts computed live at read time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RouteSummary {
    pub id: i64,
    pub name: String,
    pub grade: String,
    pub grade_color: String,
    pub route_setter: String,
    pub wall_section: String,
    pub lane: i32,
    pub lane_name: Option<String>,
    pub hold_color: Option<String>,
    pub hold_color_hex: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub grade_proposals_count: i64,
    pub warnings_count: i64,
    pub ticks_count: i64,
    pub projects_count: i64,
}

/// Detail view: summary plus nested lists of all social child records.
#[derive(Debug, Serialize)]
pub struct RouteDetail {
    #[serde(flatten)]
    pub route: RouteSummary,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub grade_proposals: Vec<GradeProposal>,
    pub warnings: Vec<Warning>,
}

/// POST /routes payload. Grade, lane and color are natural keys resolved
/// against the reference catalogs before insert.
#[derive(Debug, Deserialize)]
pub struct NewRoute {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub route_setter: Option<String>,
    pub wall_section: Option<String>,
    pub lane: Option<i32>,
    pub color: Option<String>,
    pub description: Option<String>,
}

/// PUT /routes/{id} payload; only provided fields are changed. The nullable
/// columns (color, description) distinguish an absent field (untouched) from
/// an explicit null (cleared).
#[derive(Debug, Default, Deserialize)]
pub struct RoutePatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub route_setter: Option<String>,
    pub wall_section: Option<String>,
    pub lane: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

// Present-but-null deserializes to Some(None); a missing field stays None
// through the serde default.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_distinguishes_missing_from_null() {
        let patch: RoutePatch = serde_json::from_str(r#"{ "name": "New Name" }"#).unwrap();
        assert!(patch.description.is_none());
        assert!(patch.color.is_none());

        let patch: RoutePatch =
            serde_json::from_str(r#"{ "description": null, "color": null }"#).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.color, Some(None));

        let patch: RoutePatch =
            serde_json::from_str(r#"{ "description": "slopey", "color": "Red" }"#).unwrap();
        assert_eq!(patch.description, Some(Some("slopey".to_string())));
        assert_eq!(patch.color, Some(Some("Red".to_string())));
    }
}
