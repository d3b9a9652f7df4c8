//! Repository for the `meet_entries` table.

use sqlx::PgPool;
use trackmeet_core::entry::{EntryPatch, NewEntry};
use trackmeet_core::types::DbId;

use crate::models::meet_entry::MeetEntryRow;

const COLUMNS: &str =
    "id, meet_id, athlete_id, event_id, relay_leg, relay_team, created_at, updated_at";

pub struct MeetEntryRepo;

impl MeetEntryRepo {
    pub async fn create(pool: &PgPool, input: &NewEntry) -> Result<MeetEntryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO meet_entries (meet_id, athlete_id, event_id, relay_leg, relay_team)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeetEntryRow>(&query)
            .bind(input.meet_id)
            .bind(input.athlete_id)
            .bind(input.event_id)
            .bind(input.relay_leg)
            .bind(input.relay_team.map(|t| t.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Entries of one meet in insertion order.
    pub async fn list_by_meet(pool: &PgPool, meet_id: DbId) -> Result<Vec<MeetEntryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meet_entries WHERE meet_id = $1 ORDER BY id");
        sqlx::query_as::<_, MeetEntryRow>(&query)
            .bind(meet_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<MeetEntryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meet_entries WHERE id = $1");
        sqlx::query_as::<_, MeetEntryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Apply a leg/team correction. Returns `None` if no row was updated.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        patch: &EntryPatch,
    ) -> Result<Option<MeetEntryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE meet_entries SET
                relay_leg = COALESCE($2, relay_leg),
                relay_team = COALESCE($3, relay_team),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MeetEntryRow>(&query)
            .bind(id)
            .bind(patch.relay_leg)
            .bind(patch.relay_team.map(|t| t.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Delete an entry, returning the number of rows removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meet_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
