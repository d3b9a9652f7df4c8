//! Persistence seams consumed by the store wrappers.
//!
//! Implementations live outside `core` (the PostgreSQL one is
//! `trackmeet_db::PgStore`). Outright failures are reported as
//! [`CoreError::Persistence`]; a mutation that reached the database but
//! touched zero rows is reported as `None` / `0` so callers can tell it
//! apart from a failure.

use async_trait::async_trait;

use crate::athlete::{Athlete, NewAthlete};
use crate::entry::{EntryPatch, MeetEntry, NewEntry};
use crate::error::CoreError;
use crate::types::DbId;

#[async_trait]
pub trait EntryPersistence: Send + Sync {
    async fn list_entries(&self, meet_id: DbId) -> Result<Vec<MeetEntry>, CoreError>;

    async fn create_entry(&self, input: &NewEntry) -> Result<MeetEntry, CoreError>;

    /// Returns `None` when zero rows were affected.
    async fn update_entry(
        &self,
        id: DbId,
        patch: &EntryPatch,
    ) -> Result<Option<MeetEntry>, CoreError>;

    /// Returns the number of affected rows.
    async fn delete_entry(&self, id: DbId) -> Result<u64, CoreError>;
}

#[async_trait]
pub trait ActivationPersistence: Send + Sync {
    /// Event ids with an inactive override for the meet.
    async fn list_inactive(&self, meet_id: DbId) -> Result<Vec<DbId>, CoreError>;

    async fn insert_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<(), CoreError>;

    /// Returns the number of affected rows.
    async fn delete_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<u64, CoreError>;
}

#[async_trait]
pub trait AthletePersistence: Send + Sync {
    async fn create_athlete(&self, input: &NewAthlete) -> Result<Athlete, CoreError>;
}
