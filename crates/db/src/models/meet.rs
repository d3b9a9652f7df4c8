//! Meet row model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trackmeet_core::error::CoreError;
use trackmeet_core::meet::{Meet, MeetLevel};
use trackmeet_core::types::{DbId, MeetDate, Timestamp};

/// A row from the `meets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MeetRow {
    pub id: DbId,
    pub team_id: DbId,
    pub season_id: Option<DbId>,
    pub name: String,
    pub date: MeetDate,
    pub location: Option<String>,
    pub level: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<MeetRow> for Meet {
    type Error = CoreError;

    fn try_from(row: MeetRow) -> Result<Self, Self::Error> {
        Ok(Meet {
            id: row.id,
            team_id: row.team_id,
            season_id: row.season_id,
            name: row.name,
            date: row.date,
            location: row.location,
            level: MeetLevel::parse(&row.level)?,
            notes: row.notes,
        })
    }
}

/// DTO for creating a meet.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeet {
    pub team_id: DbId,
    pub season_id: Option<DbId>,
    pub name: String,
    pub date: MeetDate,
    pub location: Option<String>,
    /// Defaults to `Both` if omitted.
    pub level: Option<MeetLevel>,
    pub notes: Option<String>,
}
