//! Team (tenant) model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trackmeet_core::billing;
use trackmeet_core::types::{DbId, Timestamp};

/// A row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub subscription_status: String,
    pub trial_ends_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Team {
    /// Whether the team's subscription allows entry edits at `now`.
    pub fn can_edit(&self, now: Timestamp) -> bool {
        billing::can_edit(&self.subscription_status, self.trial_ends_at, now)
    }
}

/// DTO for creating a team.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub slug: String,
    /// Defaults to `trialing` if omitted.
    pub subscription_status: Option<String>,
    pub trial_ends_at: Option<Timestamp>,
}
