use crate::types::DbId;

/// A business rule that rejected an assignment before anything was persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("Event {event_id} is inactive for this meet")]
    EventInactive { event_id: DbId },

    #[error("Athlete {athlete_id} is already entered in {current} individual events (limit {limit})")]
    AthleteOverLimit {
        athlete_id: DbId,
        current: usize,
        limit: usize,
    },

    #[error("Athlete {athlete_id} is already entered in event {event_id}")]
    DuplicateEntry { athlete_id: DbId, event_id: DbId },
}

impl RuleViolation {
    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EventInactive { .. } => "EVENT_INACTIVE",
            Self::AthleteOverLimit { .. } => "ATHLETE_OVER_LIMIT",
            Self::DuplicateEntry { .. } => "DUPLICATE_ENTRY",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Assignment rejected: {0}")]
    Rule(#[from] RuleViolation),

    /// The underlying create/update/delete failed outright.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
