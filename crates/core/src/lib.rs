//! Track meet entry domain logic.
//!
//! Pure rules and in-memory state for assigning athletes to the events of a
//! meet. Persistence is reached only through the traits in [`persistence`],
//! so everything here runs without a database.
//!
//! - [`assignment`]: the rule engine deciding whether an entry may be added.
//! - [`entry_store`]: a meet's entry set and its mutations.
//! - [`activation`]: per-meet event deactivation.
//! - [`drag`]: the reassignment gesture state machine.
//! - [`moves`], [`copy`], [`import`]: batch and compound operations.

pub mod activation;
pub mod assignment;
pub mod athlete;
pub mod billing;
pub mod copy;
pub mod drag;
pub mod entry;
pub mod entry_store;
pub mod error;
pub mod event;
pub mod import;
pub mod meet;
pub mod moves;
pub mod persistence;
pub mod roles;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{CoreError, RuleViolation};
