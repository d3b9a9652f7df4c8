//! Meets and athlete eligibility.

use serde::{Deserialize, Serialize};

use crate::athlete::{Athlete, Level};
use crate::error::CoreError;
use crate::types::{DbId, MeetDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetLevel {
    #[serde(rename = "JV")]
    JV,
    Varsity,
    Both,
}

impl MeetLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JV => "JV",
            Self::Varsity => "Varsity",
            Self::Both => "Both",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "JV" => Ok(Self::JV),
            "Varsity" => Ok(Self::Varsity),
            "Both" => Ok(Self::Both),
            other => Err(CoreError::Validation(format!(
                "Invalid meet level '{other}'. Must be one of: JV, Varsity, Both"
            ))),
        }
    }

    /// Whether athletes of `level` compete at a meet of this level.
    pub fn admits(&self, level: Level) -> bool {
        match self {
            Self::Both => true,
            Self::JV => level == Level::JV,
            Self::Varsity => level == Level::Varsity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meet {
    pub id: DbId,
    pub team_id: DbId,
    pub season_id: Option<DbId>,
    pub name: String,
    pub date: MeetDate,
    pub location: Option<String>,
    pub level: MeetLevel,
    pub notes: Option<String>,
}

impl Meet {
    /// Reject access to a meet owned by another team.
    pub fn ensure_owned_by(&self, team_id: DbId) -> Result<(), CoreError> {
        if self.team_id == team_id {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Meet {} does not belong to this team",
                self.id
            )))
        }
    }

    /// Active roster athletes eligible for this meet, excluding those already
    /// entered according to `is_entered`.
    ///
    /// This is the selection list offered when assigning into one event.
    pub fn available_athletes<'a, F>(&self, roster: &'a [Athlete], is_entered: F) -> Vec<&'a Athlete>
    where
        F: Fn(DbId) -> bool,
    {
        let mut available: Vec<&Athlete> = roster
            .iter()
            .filter(|a| a.active && a.team_id == self.team_id)
            .filter(|a| self.level.admits(a.level))
            .filter(|a| !is_entered(a.id))
            .collect();
        available.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        available
    }
}
