//! In-memory persistence double for store tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::athlete::{Athlete, NewAthlete};
use crate::entry::{EntryPatch, MeetEntry, NewEntry};
use crate::error::CoreError;
use crate::persistence::{ActivationPersistence, AthletePersistence, EntryPersistence};
use crate::types::DbId;

#[derive(Default)]
struct State {
    next_id: DbId,
    entries: Vec<MeetEntry>,
    inactive: Vec<(DbId, DbId)>,
    athletes: Vec<Athlete>,
    mutations: usize,
    /// Fail every create after this many more succeed.
    creates_before_failure: Option<usize>,
    /// Fail this many creates, then succeed again.
    failing_creates: usize,
    /// Deletes and updates report zero rows without changing anything.
    deny_writes: bool,
    fail_deletes: bool,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn seed_entry(&self, meet_id: DbId, athlete_id: DbId, event_id: DbId) -> MeetEntry {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let entry = MeetEntry {
            id: state.next_id,
            meet_id,
            athlete_id,
            event_id,
            relay_leg: None,
            relay_team: None,
            created_at: chrono::Utc::now(),
        };
        state.entries.push(entry.clone());
        entry
    }

    pub fn entries_for(&self, meet_id: DbId) -> Vec<MeetEntry> {
        let state = self.state.lock().unwrap();
        state
            .entries
            .iter()
            .filter(|e| e.meet_id == meet_id)
            .cloned()
            .collect()
    }

    pub fn inactive_rows(&self) -> Vec<(DbId, DbId)> {
        self.state.lock().unwrap().inactive.clone()
    }

    pub fn athletes(&self) -> Vec<Athlete> {
        self.state.lock().unwrap().athletes.clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.state.lock().unwrap().mutations
    }

    pub fn fail_creates_after(&self, successes: usize) {
        self.state.lock().unwrap().creates_before_failure = Some(successes);
    }

    pub fn fail_next_creates(&self, count: usize) {
        self.state.lock().unwrap().failing_creates = count;
    }

    pub fn deny_writes(&self, deny: bool) {
        self.state.lock().unwrap().deny_writes = deny;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_deletes = fail;
    }

    /// Delete a row behind the store's back, as another session would.
    pub fn delete_externally(&self, id: DbId) {
        self.state.lock().unwrap().entries.retain(|e| e.id != id);
    }

    fn check_create(state: &mut State) -> Result<(), CoreError> {
        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return Err(CoreError::Persistence("insert failed".into()));
        }
        match state.creates_before_failure {
            Some(0) => Err(CoreError::Persistence("insert failed".into())),
            Some(n) => {
                state.creates_before_failure = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl EntryPersistence for MemoryStore {
    async fn list_entries(&self, meet_id: DbId) -> Result<Vec<MeetEntry>, CoreError> {
        Ok(self.entries_for(meet_id))
    }

    async fn create_entry(&self, input: &NewEntry) -> Result<MeetEntry, CoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_create(&mut state)?;
        state.mutations += 1;
        state.next_id += 1;
        let entry = MeetEntry {
            id: state.next_id,
            meet_id: input.meet_id,
            athlete_id: input.athlete_id,
            event_id: input.event_id,
            relay_leg: input.relay_leg,
            relay_team: input.relay_team,
            created_at: chrono::Utc::now(),
        };
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: DbId,
        patch: &EntryPatch,
    ) -> Result<Option<MeetEntry>, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        if state.deny_writes {
            return Ok(None);
        }
        Ok(state.entries.iter_mut().find(|e| e.id == id).map(|e| {
            e.apply_patch(patch);
            e.clone()
        }))
    }

    async fn delete_entry(&self, id: DbId) -> Result<u64, CoreError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_deletes {
            return Err(CoreError::Persistence("delete failed".into()));
        }
        state.mutations += 1;
        if state.deny_writes {
            return Ok(0);
        }
        let before = state.entries.len();
        state.entries.retain(|e| e.id != id);
        Ok((before - state.entries.len()) as u64)
    }
}

#[async_trait]
impl ActivationPersistence for MemoryStore {
    async fn list_inactive(&self, meet_id: DbId) -> Result<Vec<DbId>, CoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .inactive
            .iter()
            .filter(|(m, _)| *m == meet_id)
            .map(|(_, e)| *e)
            .collect())
    }

    async fn insert_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<(), CoreError> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        state.inactive.push((meet_id, event_id));
        Ok(())
    }

    async fn delete_inactive(&self, meet_id: DbId, event_id: DbId) -> Result<u64, CoreError> {
        let mut state = self.state.lock().unwrap();
        state.mutations += 1;
        let before = state.inactive.len();
        state.inactive.retain(|row| *row != (meet_id, event_id));
        Ok((before - state.inactive.len()) as u64)
    }
}

#[async_trait]
impl AthletePersistence for MemoryStore {
    async fn create_athlete(&self, input: &NewAthlete) -> Result<Athlete, CoreError> {
        let mut state = self.state.lock().unwrap();
        Self::check_create(&mut state)?;
        state.mutations += 1;
        state.next_id += 1;
        let athlete = Athlete {
            id: state.next_id,
            team_id: input.team_id,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            grade: input.grade,
            level: input.level,
            gender: input.gender,
            active: true,
        };
        state.athletes.push(athlete.clone());
        Ok(athlete)
    }
}
