//! Repository for the `teams` table.

use sqlx::PgPool;
use trackmeet_core::types::DbId;

use crate::models::team::{CreateTeam, Team};

const COLUMNS: &str =
    "id, name, slug, subscription_status, trial_ends_at, created_at, updated_at";

pub struct TeamRepo;

impl TeamRepo {
    /// Insert a new team. `subscription_status` defaults to `trialing`.
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (name, slug, subscription_status, trial_ends_at)
             VALUES ($1, $2, COALESCE($3, 'trialing'), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.subscription_status)
            .bind(input.trial_ends_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE id = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Change the billing status. Returns `None` if the team does not exist.
    pub async fn set_subscription_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Team>, sqlx::Error> {
        let query = format!(
            "UPDATE teams SET subscription_status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
