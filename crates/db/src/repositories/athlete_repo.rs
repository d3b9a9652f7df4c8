//! Repository for the `athletes` table.

use sqlx::PgPool;
use trackmeet_core::athlete::NewAthlete;
use trackmeet_core::types::DbId;

use crate::models::athlete::{AthleteRow, UpdateAthlete};

const COLUMNS: &str =
    "id, team_id, first_name, last_name, grade, level, gender, active, created_at, updated_at";

pub struct AthleteRepo;

impl AthleteRepo {
    pub async fn create(pool: &PgPool, input: &NewAthlete) -> Result<AthleteRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO athletes (team_id, first_name, last_name, grade, level, gender)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AthleteRow>(&query)
            .bind(input.team_id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.grade)
            .bind(input.level.as_str())
            .bind(input.gender.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AthleteRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM athletes WHERE id = $1");
        sqlx::query_as::<_, AthleteRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The team roster ordered by last then first name.
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: DbId,
        active_only: bool,
    ) -> Result<Vec<AthleteRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM athletes
             WHERE team_id = $1 AND ($2 = FALSE OR active)
             ORDER BY last_name, first_name"
        );
        sqlx::query_as::<_, AthleteRow>(&query)
            .bind(team_id)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Update an athlete. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAthlete,
    ) -> Result<Option<AthleteRow>, sqlx::Error> {
        let query = format!(
            "UPDATE athletes SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                grade = COALESCE($4, grade),
                level = COALESCE($5, level),
                gender = COALESCE($6, gender),
                active = COALESCE($7, active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AthleteRow>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.grade)
            .bind(input.level.map(|l| l.as_str()))
            .bind(input.gender.map(|g| g.as_str()))
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete by clearing the active flag. Returns `true` if a row changed.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE athletes SET active = FALSE, updated_at = NOW() WHERE id = $1 AND active",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an athlete and, by cascade, their entries.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM athletes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
