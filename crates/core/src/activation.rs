//! Per-meet event activation overrides.
//!
//! Every catalog event is active for a meet unless an explicit inactive
//! override row exists. Re-activating deletes the row, so only the inactive
//! state is ever persisted.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::event::{EventCatalog, TrackEvent};
use crate::persistence::ActivationPersistence;
use crate::roles::Viewer;
use crate::types::DbId;

/// The inactive-override set for one meet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationOverlay {
    meet_id: DbId,
    inactive: HashSet<DbId>,
}

impl ActivationOverlay {
    pub fn new(meet_id: DbId, inactive: impl IntoIterator<Item = DbId>) -> Self {
        Self {
            meet_id,
            inactive: inactive.into_iter().collect(),
        }
    }

    pub fn meet_id(&self) -> DbId {
        self.meet_id
    }

    pub fn is_active(&self, event_id: DbId) -> bool {
        !self.inactive.contains(&event_id)
    }

    /// The single mutation a toggle of `event_id` must perform.
    pub fn plan_toggle(&self, event_id: DbId) -> ToggleAction {
        if self.is_active(event_id) {
            ToggleAction::Deactivate
        } else {
            ToggleAction::Activate
        }
    }

    fn apply(&mut self, event_id: DbId, action: ToggleAction) {
        match action {
            ToggleAction::Deactivate => {
                self.inactive.insert(event_id);
            }
            ToggleAction::Activate => {
                self.inactive.remove(&event_id);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    /// Insert an inactive override row.
    Deactivate,
    /// Delete the inactive override row.
    Activate,
}

/// An event as shown on a meet's entry board.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleEvent<'a> {
    #[serde(flatten)]
    pub event: &'a TrackEvent,
    pub active: bool,
}

/// Events a viewer sees for a meet, ordered by event id.
///
/// Coaches see inactive events (flagged, not assignable); everyone else only
/// sees active ones.
pub fn visible_events<'a>(
    catalog: &'a EventCatalog,
    overlay: &ActivationOverlay,
    viewer: &Viewer,
) -> Vec<VisibleEvent<'a>> {
    catalog
        .sorted()
        .into_iter()
        .map(|event| VisibleEvent {
            event,
            active: overlay.is_active(event.id),
        })
        .filter(|v| v.active || viewer.is_coach())
        .collect()
}

/// Overlay kept in sync with its persisted override rows.
pub struct ActivationStore {
    persistence: Arc<dyn ActivationPersistence>,
    overlay: ActivationOverlay,
}

impl ActivationStore {
    pub async fn load(
        persistence: Arc<dyn ActivationPersistence>,
        meet_id: DbId,
    ) -> Result<Self, CoreError> {
        let inactive = persistence.list_inactive(meet_id).await?;
        Ok(Self {
            persistence,
            overlay: ActivationOverlay::new(meet_id, inactive),
        })
    }

    pub fn overlay(&self) -> &ActivationOverlay {
        &self.overlay
    }

    pub fn is_active(&self, event_id: DbId) -> bool {
        self.overlay.is_active(event_id)
    }

    /// Flip the activation of `event_id` with exactly one mutation.
    ///
    /// Returns the new active state.
    pub async fn toggle(&mut self, event_id: DbId) -> Result<bool, CoreError> {
        let meet_id = self.overlay.meet_id;
        let action = self.overlay.plan_toggle(event_id);
        match action {
            ToggleAction::Deactivate => {
                self.persistence.insert_inactive(meet_id, event_id).await?;
            }
            ToggleAction::Activate => {
                let affected = self.persistence.delete_inactive(meet_id, event_id).await?;
                if affected == 0 {
                    tracing::warn!(meet_id, event_id, "Activation override already gone");
                }
            }
        }
        self.overlay.apply(event_id, action);
        let active = self.overlay.is_active(event_id);
        tracing::debug!(meet_id, event_id, active, "Event activation toggled");
        Ok(active)
    }
}
