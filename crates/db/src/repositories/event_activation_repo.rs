//! Repository for the `meet_event_inactive` override table.

use sqlx::PgPool;
use trackmeet_core::types::DbId;

use crate::models::event_activation::EventInactiveRow;

pub struct EventActivationRepo;

impl EventActivationRepo {
    pub async fn list_by_meet(pool: &PgPool, meet_id: DbId) -> Result<Vec<EventInactiveRow>, sqlx::Error> {
        sqlx::query_as::<_, EventInactiveRow>(
            "SELECT id, meet_id, event_id, created_at FROM meet_event_inactive
             WHERE meet_id = $1 ORDER BY event_id",
        )
        .bind(meet_id)
        .fetch_all(pool)
        .await
    }

    /// Mark an event inactive. Fails with `uq_meet_event_inactive` if it
    /// already is.
    pub async fn insert(pool: &PgPool, meet_id: DbId, event_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO meet_event_inactive (meet_id, event_id) VALUES ($1, $2)")
            .bind(meet_id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Reactivate an event, returning the number of override rows removed.
    pub async fn delete(pool: &PgPool, meet_id: DbId, event_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM meet_event_inactive WHERE meet_id = $1 AND event_id = $2")
            .bind(meet_id)
            .bind(event_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
