//! Athlete roster types.
//!
//! Level and gender are stored as `TEXT` columns; [`Level::parse`] and
//! [`Gender::parse`] are the strict converters used when reading rows, while
//! the lenient heuristics used by bulk import live in [`crate::import`].

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Competition level of an athlete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "JV")]
    JV,
    Varsity,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JV => "JV",
            Self::Varsity => "Varsity",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "JV" => Ok(Self::JV),
            "Varsity" => Ok(Self::Varsity),
            other => Err(CoreError::Validation(format!(
                "Invalid level '{other}'. Must be one of: JV, Varsity"
            ))),
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Boys,
    Girls,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boys => "Boys",
            Self::Girls => "Girls",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Boys" => Ok(Self::Boys),
            "Girls" => Ok(Self::Girls),
            other => Err(CoreError::Validation(format!(
                "Invalid gender '{other}'. Must be one of: Boys, Girls"
            ))),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An athlete on a team roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Athlete {
    pub id: DbId,
    pub team_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<i32>,
    pub level: Level,
    pub gender: Gender,
    pub active: bool,
}

/// Payload for creating an athlete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAthlete {
    pub team_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<i32>,
    pub level: Level,
    pub gender: Gender,
}
