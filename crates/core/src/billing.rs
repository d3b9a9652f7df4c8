//! Subscription status names and the edit-permission gate.

use crate::error::CoreError;
use crate::types::Timestamp;

pub const STATUS_TRIALING: &str = "trialing";
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_PAST_DUE: &str = "past_due";
pub const STATUS_CANCELED: &str = "canceled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_TRIALING,
    STATUS_ACTIVE,
    STATUS_PAST_DUE,
    STATUS_CANCELED,
];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid subscription status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Whether a team with this subscription may edit its data at `now`.
///
/// Trials without an end date are open-ended. Lapsed teams stay readable.
pub fn can_edit(status: &str, trial_ends_at: Option<Timestamp>, now: Timestamp) -> bool {
    match status {
        STATUS_ACTIVE => true,
        STATUS_TRIALING => trial_ends_at.map_or(true, |ends| now < ends),
        _ => false,
    }
}
