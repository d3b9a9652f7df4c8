//! Meet entries: one athlete placed into one event for one meet.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// First relay leg.
pub const MIN_RELAY_LEG: i16 = 1;

/// Last relay leg (a relay squad runs four legs).
pub const MAX_RELAY_LEG: i16 = 4;

/// Relay squad label within one relay event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelayTeam {
    A,
    Alt,
}

impl RelayTeam {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Alt => "Alt",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "A" => Ok(Self::A),
            "Alt" => Ok(Self::Alt),
            other => Err(CoreError::Validation(format!(
                "Invalid relay team '{other}'. Must be one of: A, Alt"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetEntry {
    pub id: DbId,
    pub meet_id: DbId,
    pub athlete_id: DbId,
    pub event_id: DbId,
    pub relay_leg: Option<i16>,
    pub relay_team: Option<RelayTeam>,
    pub created_at: Timestamp,
}

impl MeetEntry {
    /// The `(athlete, event)` pair used for duplicate detection.
    pub fn dedup_key(&self) -> (DbId, DbId) {
        (self.athlete_id, self.event_id)
    }

    /// Re-target this entry's payload at another meet, keeping relay data.
    pub fn to_new_entry(&self, meet_id: DbId) -> NewEntry {
        NewEntry {
            meet_id,
            athlete_id: self.athlete_id,
            event_id: self.event_id,
            relay_leg: self.relay_leg,
            relay_team: self.relay_team,
        }
    }

    pub(crate) fn apply_patch(&mut self, patch: &EntryPatch) {
        if let Some(leg) = patch.relay_leg {
            self.relay_leg = Some(leg);
        }
        if let Some(team) = patch.relay_team {
            self.relay_team = Some(team);
        }
    }
}

/// Entry payload ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub meet_id: DbId,
    pub athlete_id: DbId,
    pub event_id: DbId,
    pub relay_leg: Option<i16>,
    pub relay_team: Option<RelayTeam>,
}

/// Partial update for leg/team corrections. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub relay_leg: Option<i16>,
    pub relay_team: Option<RelayTeam>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.relay_leg.is_none() && self.relay_team.is_none()
    }
}

/// Validate that a relay leg lies in `1..=4`.
pub fn validate_relay_leg(leg: i16) -> Result<(), CoreError> {
    if (MIN_RELAY_LEG..=MAX_RELAY_LEG).contains(&leg) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Relay leg must be between {MIN_RELAY_LEG} and {MAX_RELAY_LEG}, got {leg}"
        )))
    }
}
