//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` struct matching the
//! table row. Enumerated columns are `TEXT` in the database; rows convert
//! into the `trackmeet_core` domain types with `TryFrom`, which fails if a
//! column holds a value the core does not know.

pub mod athlete;
pub mod event_activation;
pub mod meet;
pub mod meet_entry;
pub mod team;
pub mod track_event;
