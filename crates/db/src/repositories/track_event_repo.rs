//! Repository for the `track_events` catalog.

use sqlx::PgPool;
use trackmeet_core::types::DbId;

use crate::models::track_event::TrackEventRow;

const COLUMNS: &str =
    "id, name, short_name, category, max_entries, is_relay, sort_order, created_at, updated_at";

pub struct TrackEventRepo;

impl TrackEventRepo {
    /// The whole catalog in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<TrackEventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM track_events ORDER BY sort_order, name");
        sqlx::query_as::<_, TrackEventRow>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TrackEventRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM track_events WHERE id = $1");
        sqlx::query_as::<_, TrackEventRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
