//! Track event catalog row model.

use serde::Serialize;
use sqlx::FromRow;
use trackmeet_core::error::CoreError;
use trackmeet_core::event::{EventCategory, TrackEvent};
use trackmeet_core::types::{DbId, Timestamp};

/// A row from the `track_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TrackEventRow {
    pub id: DbId,
    pub name: String,
    pub short_name: String,
    pub category: String,
    pub max_entries: Option<i32>,
    pub is_relay: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TrackEventRow> for TrackEvent {
    type Error = CoreError;

    fn try_from(row: TrackEventRow) -> Result<Self, Self::Error> {
        Ok(TrackEvent {
            id: row.id,
            name: row.name,
            short_name: row.short_name,
            category: EventCategory::parse(&row.category)?,
            max_entries: row.max_entries,
            is_relay: row.is_relay,
        })
    }
}
