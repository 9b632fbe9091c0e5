use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A logged ascent record for one user on one route. One row per
/// (user, route); writes are upserts.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tick {
    pub id: i64,
    pub user_id: i64,
    pub route_id: i64,
    pub attempts: i32,
    pub top_rope_send: bool,
    pub lead_send: bool,
    pub top_rope_flash: bool,
    pub lead_flash: bool,
    /// Legacy combined flash flag kept for older clients; never auto-derived
    /// from the per-style flags by the patch path.
    pub flash: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tick {
    pub fn has_any_send(&self) -> bool {
        self.top_rope_send || self.lead_send
    }

    pub fn has_any_flash(&self) -> bool {
        self.top_rope_flash || self.lead_flash
    }

    pub fn values(&self) -> TickValues {
        TickValues {
            attempts: self.attempts,
            top_rope_send: self.top_rope_send,
            lead_send: self.lead_send,
            top_rope_flash: self.top_rope_flash,
            lead_flash: self.lead_flash,
            flash: self.flash,
            notes: self.notes.clone(),
        }
    }
}

/// Tick joined with its route for the logbook listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TickWithRoute {
    pub id: i64,
    pub user_id: i64,
    pub route_id: i64,
    pub attempts: i32,
    pub top_rope_send: bool,
    pub lead_send: bool,
    pub top_rope_flash: bool,
    pub lead_flash: bool,
    pub flash: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub route_name: String,
    pub route_grade: String,
    pub wall_section: String,
}

/// POST /routes/{id}/ticks payload: any subset of fields; `attempts` sets the
/// counter absolutely, `add_attempts` increments it.
#[derive(Debug, Default, Deserialize)]
pub struct TickPatch {
    pub attempts: Option<i32>,
    pub add_attempts: Option<i32>,
    pub top_rope_send: Option<bool>,
    pub lead_send: Option<bool>,
    pub top_rope_flash: Option<bool>,
    pub lead_flash: Option<bool>,
    pub flash: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStyle {
    TopRope,
    Lead,
}

impl SendStyle {
    pub const VALID: [&'static str; 2] = ["top_rope", "lead"];

    /// Parse the wire name; unknown styles are handled with a structured
    /// validation error rather than a deserialization rejection.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "top_rope" => Some(SendStyle::TopRope),
            "lead" => Some(SendStyle::Lead),
            _ => None,
        }
    }
}

/// Mutable column set of a tick row, used as the single write path: load (or
/// default), apply, upsert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickValues {
    pub attempts: i32,
    pub top_rope_send: bool,
    pub lead_send: bool,
    pub top_rope_flash: bool,
    pub lead_flash: bool,
    pub flash: bool,
    pub notes: Option<String>,
}

impl TickValues {
    /// Apply a client patch. After application, a first-try completion forces
    /// the matching per-style flash flag: attempts == 1 with a send flag set
    /// implies that style was flashed, regardless of what the patch said.
    pub fn apply_patch(&mut self, patch: &TickPatch) {
        if let Some(attempts) = patch.attempts {
            self.attempts = attempts;
        }
        if let Some(add) = patch.add_attempts {
            self.attempts += add;
        }
        if let Some(v) = patch.top_rope_send {
            self.top_rope_send = v;
        }
        if let Some(v) = patch.lead_send {
            self.lead_send = v;
        }
        if let Some(v) = patch.top_rope_flash {
            self.top_rope_flash = v;
        }
        if let Some(v) = patch.lead_flash {
            self.lead_flash = v;
        }
        if let Some(v) = patch.flash {
            self.flash = v;
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }

        if self.attempts == 1 {
            if self.top_rope_send {
                self.top_rope_flash = true;
            }
            if self.lead_send {
                self.lead_flash = true;
            }
        }
    }

    /// Record a send in the given style. Only a first attempt (attempts <= 1)
    /// also counts as a flash, and then the legacy combined flag is set too.
    pub fn apply_send(&mut self, style: SendStyle, notes: Option<&str>) {
        if let Some(notes) = notes {
            self.notes = Some(notes.to_string());
        }

        match style {
            SendStyle::TopRope => self.top_rope_send = true,
            SendStyle::Lead => self.lead_send = true,
        }

        if self.attempts <= 1 {
            match style {
                SendStyle::TopRope => self.top_rope_flash = true,
                SendStyle::Lead => self.lead_flash = true,
            }
            self.flash = true;
        }
    }
}
