//! Route definitions for a meet's entry board.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{copy, entries, events};
use crate::state::AppState;

/// Meet-scoped routes mounted at `/meets`.
///
/// ```text
/// GET    /{meet_id}/events                         -> list_for_meet
/// POST   /{meet_id}/events/{event_id}/toggle       -> toggle_event
/// GET    /{meet_id}/events/{event_id}/available    -> available_athletes
/// GET    /{meet_id}/entries                        -> list_entries
/// POST   /{meet_id}/entries                        -> create_entry
/// POST   /{meet_id}/entries/batch                  -> assign_batch
/// PATCH  /{meet_id}/entries/{id}                   -> update_entry
/// DELETE /{meet_id}/entries/{id}                   -> delete_entry
/// POST   /{meet_id}/entries/{id}/move              -> move_entry
/// POST   /{meet_id}/copy                           -> copy_entries
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{meet_id}/events", get(events::list_for_meet))
        .route(
            "/{meet_id}/events/{event_id}/toggle",
            post(events::toggle_event),
        )
        .route(
            "/{meet_id}/events/{event_id}/available",
            get(events::available_athletes),
        )
        .route(
            "/{meet_id}/entries",
            get(entries::list_entries).post(entries::create_entry),
        )
        .route("/{meet_id}/entries/batch", post(entries::assign_batch))
        .route(
            "/{meet_id}/entries/{id}",
            patch(entries::update_entry).delete(entries::delete_entry),
        )
        .route("/{meet_id}/entries/{id}/move", post(entries::move_entry))
        .route("/{meet_id}/copy", post(copy::copy_entries))
}
