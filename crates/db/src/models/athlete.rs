//! Athlete row model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trackmeet_core::athlete::{Athlete, Gender, Level};
use trackmeet_core::error::CoreError;
use trackmeet_core::types::{DbId, Timestamp};

/// A row from the `athletes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AthleteRow {
    pub id: DbId,
    pub team_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<i32>,
    pub level: String,
    pub gender: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<AthleteRow> for Athlete {
    type Error = CoreError;

    fn try_from(row: AthleteRow) -> Result<Self, Self::Error> {
        Ok(Athlete {
            id: row.id,
            team_id: row.team_id,
            first_name: row.first_name,
            last_name: row.last_name,
            grade: row.grade,
            level: Level::parse(&row.level)?,
            gender: Gender::parse(&row.gender)?,
            active: row.active,
        })
    }
}

/// DTO for updating an athlete. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAthlete {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub grade: Option<i32>,
    pub level: Option<Level>,
    pub gender: Option<Gender>,
    pub active: Option<bool>,
}
