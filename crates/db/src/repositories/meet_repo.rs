//! Repository for the `meets` table.

use sqlx::PgPool;
use trackmeet_core::types::DbId;

use crate::models::meet::{CreateMeet, MeetRow};

const COLUMNS: &str =
    "id, team_id, season_id, name, date, location, level, notes, created_at, updated_at";

pub struct MeetRepo;

impl MeetRepo {
    /// Insert a new meet. `level` defaults to `Both`.
    pub async fn create(pool: &PgPool, input: &CreateMeet) -> Result<MeetRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO meets (team_id, season_id, name, date, location, level, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'Both'), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeetRow>(&query)
            .bind(input.team_id)
            .bind(input.season_id)
            .bind(&input.name)
            .bind(input.date)
            .bind(&input.location)
            .bind(input.level.map(|l| l.as_str()))
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MeetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meets WHERE id = $1");
        sqlx::query_as::<_, MeetRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A team's meets, most recent first.
    pub async fn list_by_team(pool: &PgPool, team_id: DbId) -> Result<Vec<MeetRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meets WHERE team_id = $1 ORDER BY date DESC, id DESC");
        sqlx::query_as::<_, MeetRow>(&query)
            .bind(team_id)
            .fetch_all(pool)
            .await
    }
}
