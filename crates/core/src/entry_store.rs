//! The authoritative entry set of one meet.
//!
//! [`EntryStore`] mirrors the meet's persisted entries and is the only thing
//! that mutates them. A delete or update that reaches the database but
//! touches zero rows may be an authorization denial or an idempotent no-op;
//! the store applies the change locally anyway, reports
//! [`MutationOutcome::Tentative`], and stays flagged until [`EntryStore::reconcile`]
//! re-reads the persisted set.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::activation::ActivationOverlay;
use crate::assignment::{can_assign, count_individual_entries, plan_batch, AssignRequest, AssignmentOptions, RelayLegCounter};
use crate::entry::{validate_relay_leg, EntryPatch, MeetEntry, NewEntry, RelayTeam};
use crate::error::CoreError;
use crate::event::EventCatalog;
use crate::persistence::EntryPersistence;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The database reported the row as changed.
    Confirmed,
    /// Zero rows affected; applied locally pending reconciliation.
    Tentative,
}

/// Result of a select-all assignment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub added: Vec<MeetEntry>,
    pub rejected: Vec<BatchRejection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRejection {
    pub athlete_id: DbId,
    pub code: &'static str,
    pub message: String,
}

impl BatchRejection {
    fn new(athlete_id: DbId, err: &CoreError) -> Self {
        let code = match err {
            CoreError::Rule(rule) => rule.code(),
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::Persistence(_) => "PERSISTENCE_ERROR",
            _ => "INTERNAL_ERROR",
        };
        Self {
            athlete_id,
            code,
            message: err.to_string(),
        }
    }
}

pub struct EntryStore {
    persistence: Arc<dyn EntryPersistence>,
    catalog: Arc<EventCatalog>,
    meet_id: DbId,
    entries: Vec<MeetEntry>,
    needs_reconcile: bool,
}

impl EntryStore {
    /// Fetch the meet's entries and build the store.
    pub async fn load(
        persistence: Arc<dyn EntryPersistence>,
        catalog: Arc<EventCatalog>,
        meet_id: DbId,
    ) -> Result<Self, CoreError> {
        let entries = persistence.list_entries(meet_id).await?;
        Ok(Self {
            persistence,
            catalog,
            meet_id,
            entries,
            needs_reconcile: false,
        })
    }

    pub fn meet_id(&self) -> DbId {
        self.meet_id
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn entries(&self) -> &[MeetEntry] {
        &self.entries
    }

    /// True after a tentative mutation, until the next [`Self::reconcile`].
    pub fn needs_reconcile(&self) -> bool {
        self.needs_reconcile
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Persist a new entry and append it to the local set.
    pub async fn add(&mut self, input: &NewEntry) -> Result<MeetEntry, CoreError> {
        if input.meet_id != self.meet_id {
            return Err(CoreError::Validation(format!(
                "Entry belongs to meet {} but this store holds meet {}",
                input.meet_id, self.meet_id
            )));
        }
        let created = self.persistence.create_entry(input).await?;
        tracing::debug!(
            meet_id = self.meet_id,
            entry_id = created.id,
            athlete_id = created.athlete_id,
            event_id = created.event_id,
            "Entry added"
        );
        self.entries.push(created.clone());
        Ok(created)
    }

    /// Delete an entry.
    ///
    /// A hard failure leaves the local set untouched. Zero affected rows
    /// still removes the local copy and flags the store for reconciliation.
    pub async fn remove(&mut self, entry_id: DbId) -> Result<MutationOutcome, CoreError> {
        let position = self.position(entry_id)?;
        let affected = self.persistence.delete_entry(entry_id).await?;
        self.entries.remove(position);

        if affected == 0 {
            tracing::warn!(
                meet_id = self.meet_id,
                entry_id,
                "Delete affected zero rows; removed locally pending reconcile"
            );
            self.needs_reconcile = true;
            return Ok(MutationOutcome::Tentative);
        }
        tracing::debug!(meet_id = self.meet_id, entry_id, "Entry removed");
        Ok(MutationOutcome::Confirmed)
    }

    /// Apply a leg/team correction.
    pub async fn update(
        &mut self,
        entry_id: DbId,
        patch: &EntryPatch,
    ) -> Result<(MeetEntry, MutationOutcome), CoreError> {
        let position = self.position(entry_id)?;
        if patch.is_empty() {
            return Err(CoreError::Validation("Nothing to update".into()));
        }
        if !self.catalog.is_relay(self.entries[position].event_id) {
            return Err(CoreError::Validation(
                "Relay leg and team only apply to relay events".into(),
            ));
        }
        if let Some(leg) = patch.relay_leg {
            validate_relay_leg(leg)?;
        }

        match self.persistence.update_entry(entry_id, patch).await? {
            Some(updated) => {
                self.entries[position] = updated.clone();
                Ok((updated, MutationOutcome::Confirmed))
            }
            None => {
                tracing::warn!(
                    meet_id = self.meet_id,
                    entry_id,
                    "Update affected zero rows; merged locally pending reconcile"
                );
                let local = &mut self.entries[position];
                local.apply_patch(patch);
                self.needs_reconcile = true;
                Ok((local.clone(), MutationOutcome::Tentative))
            }
        }
    }

    /// Replace the local set with the persisted one.
    pub async fn reconcile(&mut self) -> Result<(), CoreError> {
        let fresh = self.persistence.list_entries(self.meet_id).await?;
        tracing::debug!(
            meet_id = self.meet_id,
            local = self.entries.len(),
            persisted = fresh.len(),
            "Entry set reconciled"
        );
        self.entries = fresh;
        self.needs_reconcile = false;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Assignment flows
    // -----------------------------------------------------------------------

    /// Validate `request` against the rules, then persist it.
    pub async fn assign(
        &mut self,
        event_id: DbId,
        request: &AssignRequest,
        overlay: &ActivationOverlay,
        options: &AssignmentOptions,
    ) -> Result<MeetEntry, CoreError> {
        self.ensure_overlay(overlay)?;
        let event = self.catalog.require(event_id)?;
        let planned = can_assign(event, request, &self.entries, &self.catalog, overlay, options)?;
        self.add(&planned).await
    }

    /// Single-athlete assignment. Relay events take their leg from `counter`,
    /// which advances only after the entry is persisted.
    pub async fn assign_single(
        &mut self,
        event_id: DbId,
        athlete_id: DbId,
        relay_team: Option<RelayTeam>,
        counter: &mut RelayLegCounter,
        overlay: &ActivationOverlay,
        options: &AssignmentOptions,
    ) -> Result<MeetEntry, CoreError> {
        let is_relay = self.catalog.require(event_id)?.is_relay;
        let request = AssignRequest {
            athlete_id,
            relay_team,
            relay_leg: is_relay.then(|| counter.peek()),
            replacing: None,
        };
        let created = self.assign(event_id, &request, overlay, options).await?;
        if is_relay {
            counter.advance();
        }
        Ok(created)
    }

    /// Select-all assignment. Adds are issued one at a time; a rejected or
    /// failed athlete does not stop the rest.
    pub async fn assign_batch(
        &mut self,
        event_id: DbId,
        athlete_ids: &[DbId],
        relay_team: Option<RelayTeam>,
        overlay: &ActivationOverlay,
        options: &AssignmentOptions,
    ) -> Result<BatchReport, CoreError> {
        self.ensure_overlay(overlay)?;
        let event = self.catalog.require(event_id)?;
        let plan = plan_batch(
            event,
            athlete_ids,
            relay_team,
            &self.entries,
            &self.catalog,
            overlay,
            options,
        );

        let mut report = BatchReport::default();
        for (athlete_id, decision) in plan {
            let result = match decision {
                Ok(planned) => self.add(&planned).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(created) => report.added.push(created),
                Err(err) => report.rejected.push(BatchRejection::new(athlete_id, &err)),
            }
        }
        tracing::info!(
            meet_id = self.meet_id,
            event_id,
            added = report.added.len(),
            rejected = report.rejected.len(),
            "Batch assignment finished"
        );
        Ok(report)
    }

    // -----------------------------------------------------------------------
    // Derived lookups
    // -----------------------------------------------------------------------

    pub fn get(&self, entry_id: DbId) -> Option<&MeetEntry> {
        self.entries.iter().find(|e| e.id == entry_id)
    }

    pub fn by_event(&self, event_id: DbId) -> Vec<&MeetEntry> {
        self.entries.iter().filter(|e| e.event_id == event_id).collect()
    }

    pub fn by_athlete(&self, athlete_id: DbId) -> Vec<&MeetEntry> {
        self.entries
            .iter()
            .filter(|e| e.athlete_id == athlete_id)
            .collect()
    }

    pub fn count_for_athlete(&self, athlete_id: DbId, exclude_relays: bool) -> usize {
        count_individual_entries(athlete_id, &self.entries, &self.catalog, exclude_relays)
    }

    pub fn contains(&self, athlete_id: DbId, event_id: DbId) -> bool {
        self.entries
            .iter()
            .any(|e| e.athlete_id == athlete_id && e.event_id == event_id)
    }

    /// Entries grouped per event, relay entries ordered by squad then leg.
    pub fn grouped_by_event(&self) -> BTreeMap<DbId, Vec<&MeetEntry>> {
        let mut groups: BTreeMap<DbId, Vec<&MeetEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups.entry(entry.event_id).or_default().push(entry);
        }
        for group in groups.values_mut() {
            group.sort_by_key(|e| {
                (
                    e.relay_team.map(|t| t.as_str()),
                    e.relay_leg.unwrap_or(i16::MAX),
                    e.created_at,
                )
            });
        }
        groups
    }

    /// Entries already filling a relay squad, for resuming the leg counter.
    pub fn squad_size(&self, event_id: DbId, team: RelayTeam) -> usize {
        self.entries
            .iter()
            .filter(|e| e.event_id == event_id && e.relay_team == Some(team))
            .count()
    }

    fn position(&self, entry_id: DbId) -> Result<usize, CoreError> {
        self.entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or(CoreError::NotFound {
                entity: "MeetEntry",
                id: entry_id,
            })
    }

    fn ensure_overlay(&self, overlay: &ActivationOverlay) -> Result<(), CoreError> {
        if overlay.meet_id() == self.meet_id {
            Ok(())
        } else {
            Err(CoreError::Internal(format!(
                "Activation overlay for meet {} used with meet {}",
                overlay.meet_id(),
                self.meet_id
            )))
        }
    }
}
