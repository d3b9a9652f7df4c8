pub mod athletes;
pub mod context;
pub mod copy;
pub mod entries;
pub mod events;
