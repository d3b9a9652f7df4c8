//! Well-known role name constants and viewer permissions.

use crate::error::CoreError;
use crate::types::DbId;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COACH: &str = "coach";
pub const ROLE_PARENT: &str = "parent";
pub const ROLE_ATHLETE: &str = "athlete";

pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_COACH, ROLE_PARENT, ROLE_ATHLETE];

pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// Who is looking at a team's meets, as told by the auth and billing providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub team_id: DbId,
    pub role: String,
    /// Coach accounts are approved by a team admin before they can edit.
    pub approved: bool,
    /// Edit permission from the billing provider.
    pub billing_can_edit: bool,
}

impl Viewer {
    pub fn new(team_id: DbId, role: &str, approved: bool, billing_can_edit: bool) -> Self {
        Self {
            team_id,
            role: role.to_string(),
            approved,
            billing_can_edit,
        }
    }

    /// Coaches and admins see the coach view (including inactive events).
    pub fn is_coach(&self) -> bool {
        self.role == ROLE_COACH || self.role == ROLE_ADMIN
    }

    /// Whether this viewer may change entries, activations and rosters.
    pub fn can_mutate(&self) -> bool {
        self.is_coach() && self.approved && self.billing_can_edit
    }

    /// Fail with `Forbidden` naming the first missing permission.
    pub fn ensure_can_mutate(&self) -> Result<(), CoreError> {
        if !self.is_coach() {
            return Err(CoreError::Forbidden("Coach role required".into()));
        }
        if !self.approved {
            return Err(CoreError::Forbidden(
                "Coach account is awaiting approval".into(),
            ));
        }
        if !self.billing_can_edit {
            return Err(CoreError::Forbidden(
                "Team subscription does not allow editing".into(),
            ));
        }
        Ok(())
    }
}
