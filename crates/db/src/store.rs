//! [`PgStore`]: the core persistence traits over a PostgreSQL pool.

use async_trait::async_trait;
use sqlx::PgPool;
use trackmeet_core::athlete::{Athlete, NewAthlete};
use trackmeet_core::entry::{EntryPatch, MeetEntry, NewEntry};
use trackmeet_core::error::CoreError;
use trackmeet_core::event::{EventCatalog, TrackEvent};
use trackmeet_core::persistence::{ActivationPersistence, AthletePersistence, EntryPersistence};
use trackmeet_core::types::DbId;

use crate::repositories::{AthleteRepo, EventActivationRepo, MeetEntryRepo, TrackEventRepo};

/// PostgreSQL unique-violation error code.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL foreign-key-violation error code.
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the event catalog.
    pub async fn load_catalog(&self) -> Result<EventCatalog, CoreError> {
        let rows = TrackEventRepo::list(&self.pool).await.map_err(map_sqlx)?;
        let events = rows
            .into_iter()
            .map(TrackEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EventCatalog::new(events))
    }
}

/// Translate a database failure into the core taxonomy.
///
/// Constraint violations become `Conflict` / `Validation` so callers can
/// report them; everything else is a `Persistence` failure.
pub fn map_sqlx(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let constraint = db_err.constraint().unwrap_or("unique constraint");
                return CoreError::Conflict(format!("Duplicate value violates {constraint}"));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return CoreError::Validation("Referenced record does not exist".into());
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Persistence(err.to_string())
}

#[async_trait]
impl EntryPersistence for PgStore {
    async fn list_entries(&self, meet_id: DbId) -> Result<Vec<MeetEntry>, CoreError> {
        MeetEntryRepo::list_by_meet(&self.pool, meet_id)
            .await
            .map_err(map_sqlx)?
            .into_iter()
            .map(MeetEntry::try_from)
            .collect()
    }

    async fn create_entry(&self, input: &NewEntry) -> Result<MeetEntry, CoreError> {
        let row = MeetEntryRepo::create(&self.pool, input).await.map_err(map_sqlx)?;
        MeetEntry::try_from(row)
    }

    async fn update_entry(
        &self,
        id: DbId,
        patch: &EntryPatch,
    ) -> Result<Option<MeetEntry>, CoreError> {
        MeetEntryRepo::update(&self.pool, id, patch)
            .await
            .map_err(map_sqlx)?
            .map(MeetEntry::try_from)
            .transpose()
    }

    async fn delete_entry(&self, id: DbId) -> Result<u64, CoreError> {
        MeetEntryRepo::delete(&self.pool, id).await.map_err(map_sqlx)
    }
}

#[async_trait]
impl ActivationPersistence for PgStore {
    async fn list_inactive(&self, meet_id: DbId) -> Result<Vec<DbId>, CoreError> {
        let rows = EventActivationRepo::list_by_meet(&self.pool, meet_id)
            .await
            .map_err(map_sqlx)?;
        Ok(rows.into_iter().map(|r| r.event_id).collect())
    }

    async fn insert_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<(), CoreError> {
        EventActivationRepo::insert(&self.pool, meet_id, event_id)
            .await
            .map_err(map_sqlx)
    }

    async fn delete_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<u64, CoreError> {
        EventActivationRepo::delete(&self.pool, meet_id, event_id)
            .await
            .map_err(map_sqlx)
    }
}

#[async_trait]
impl AthletePersistence for PgStore {
    async fn create_athlete(&self, input: &NewAthlete) -> Result<Athlete, CoreError> {
        let row = AthleteRepo::create(&self.pool, input).await.map_err(map_sqlx)?;
        Athlete::try_from(row)
    }
}
