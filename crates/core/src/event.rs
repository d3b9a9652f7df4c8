//! The global track & field event catalog.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entry::RelayTeam;
use crate::error::CoreError;
use crate::types::DbId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    Field,
    Sprint,
    Distance,
    Hurdles,
    Relay,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Field => "Field",
            Self::Sprint => "Sprint",
            Self::Distance => "Distance",
            Self::Hurdles => "Hurdles",
            Self::Relay => "Relay",
            Self::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Field" => Ok(Self::Field),
            "Sprint" => Ok(Self::Sprint),
            "Distance" => Ok(Self::Distance),
            "Hurdles" => Ok(Self::Hurdles),
            "Relay" => Ok(Self::Relay),
            "Other" => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Invalid event category '{other}'"
            ))),
        }
    }
}

/// One event in the catalog (e.g. "100 Meter Dash", "4x100 Relay").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEvent {
    pub id: DbId,
    pub name: String,
    pub short_name: String,
    pub category: EventCategory,
    /// Advisory capacity; never enforced by the rule engine.
    pub max_entries: Option<i32>,
    pub is_relay: bool,
}

impl TrackEvent {
    /// Squad label a relay assignment uses when the caller does not pick one.
    ///
    /// Events whose short name contains "Alt" hold the alternate squad.
    /// Returns `None` for individual events.
    pub fn default_relay_team(&self) -> Option<RelayTeam> {
        if !self.is_relay {
            None
        } else if self.short_name.contains("Alt") {
            Some(RelayTeam::Alt)
        } else {
            Some(RelayTeam::A)
        }
    }

    /// Compare an entry count against the advisory `max_entries`.
    pub fn capacity_status(&self, entry_count: usize) -> CapacityStatus {
        match self.max_entries {
            None => CapacityStatus::Unlimited,
            Some(max) => {
                let max = max.max(0) as usize;
                match entry_count.cmp(&max) {
                    std::cmp::Ordering::Less => CapacityStatus::Open {
                        remaining: max - entry_count,
                    },
                    std::cmp::Ordering::Equal => CapacityStatus::Full,
                    std::cmp::Ordering::Greater => CapacityStatus::Over {
                        excess: entry_count - max,
                    },
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CapacityStatus {
    Unlimited,
    Open { remaining: usize },
    Full,
    Over { excess: usize },
}

/// Lookup table over the event catalog, keyed by event id.
#[derive(Debug, Clone, Default)]
pub struct EventCatalog {
    events: HashMap<DbId, TrackEvent>,
}

impl EventCatalog {
    pub fn new(events: impl IntoIterator<Item = TrackEvent>) -> Self {
        Self {
            events: events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn get(&self, event_id: DbId) -> Option<&TrackEvent> {
        self.events.get(&event_id)
    }

    /// Resolve an event or fail with `NotFound`.
    pub fn require(&self, event_id: DbId) -> Result<&TrackEvent, CoreError> {
        self.get(event_id).ok_or(CoreError::NotFound {
            entity: "TrackEvent",
            id: event_id,
        })
    }

    /// Unknown ids are treated as individual events.
    pub fn is_relay(&self, event_id: DbId) -> bool {
        self.get(event_id).is_some_and(|e| e.is_relay)
    }

    /// Events ordered by id, for stable output.
    pub fn sorted(&self) -> Vec<&TrackEvent> {
        let mut events: Vec<&TrackEvent> = self.events.values().collect();
        events.sort_by_key(|e| e.id);
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn individual(id: DbId, name: &str) -> TrackEvent {
        TrackEvent {
            id,
            name: name.to_string(),
            short_name: name.to_string(),
            category: EventCategory::Sprint,
            max_entries: None,
            is_relay: false,
        }
    }

    pub fn relay(id: DbId, short_name: &str) -> TrackEvent {
        TrackEvent {
            id,
            name: format!("{short_name} Relay"),
            short_name: short_name.to_string(),
            category: EventCategory::Relay,
            max_entries: None,
            is_relay: true,
        }
    }
}
