//! Meet entry row model.

use serde::Serialize;
use sqlx::FromRow;
use trackmeet_core::entry::{MeetEntry, RelayTeam};
use trackmeet_core::error::CoreError;
use trackmeet_core::types::{DbId, Timestamp};

/// A row from the `meet_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeetEntryRow {
    pub id: DbId,
    pub meet_id: DbId,
    pub athlete_id: DbId,
    pub event_id: DbId,
    pub relay_leg: Option<i16>,
    pub relay_team: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<MeetEntryRow> for MeetEntry {
    type Error = CoreError;

    fn try_from(row: MeetEntryRow) -> Result<Self, Self::Error> {
        Ok(MeetEntry {
            id: row.id,
            meet_id: row.meet_id,
            athlete_id: row.athlete_id,
            event_id: row.event_id,
            relay_leg: row.relay_leg,
            relay_team: row.relay_team.as_deref().map(RelayTeam::parse).transpose()?,
            created_at: row.created_at,
        })
    }
}
