//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod athlete_repo;
pub mod event_activation_repo;
pub mod meet_entry_repo;
pub mod meet_repo;
pub mod team_repo;
pub mod track_event_repo;

pub use athlete_repo::AthleteRepo;
pub use event_activation_repo::EventActivationRepo;
pub use meet_entry_repo::MeetEntryRepo;
pub use meet_repo::MeetRepo;
pub use team_repo::TeamRepo;
pub use track_event_repo::TrackEventRepo;
