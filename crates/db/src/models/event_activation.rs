//! Per-meet inactive event override model.

use serde::Serialize;
use sqlx::FromRow;
use trackmeet_core::types::{DbId, Timestamp};

/// A row from the `meet_event_inactive` table. Its presence marks the event
/// inactive for the meet.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventInactiveRow {
    pub id: DbId,
    pub meet_id: DbId,
    pub event_id: DbId,
    pub created_at: Timestamp,
}
