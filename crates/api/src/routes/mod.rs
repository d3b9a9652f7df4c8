pub mod athletes;
pub mod events;
pub mod health;
pub mod meets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events                                          event catalog
///
/// /meets/{meet_id}/events                          board events with activation flag
/// /meets/{meet_id}/events/{event_id}/toggle        toggle activation (coach)
/// /meets/{meet_id}/events/{event_id}/available     roster athletes not yet entered
/// /meets/{meet_id}/entries                         list grouped, single assign (coach)
/// /meets/{meet_id}/entries/batch                   select-all assign (coach)
/// /meets/{meet_id}/entries/{id}                    leg/team correction, remove (coach)
/// /meets/{meet_id}/entries/{id}/move               move to another event (coach)
/// /meets/{meet_id}/copy                            copy entries from another meet (coach)
///
/// /athletes                                        active roster
/// /athletes/import/preview                         parse pasted roster text
/// /athletes/import                                 parse and create valid rows (coach)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", events::router())
        .nest("/meets", meets::router())
        .nest("/athletes", athletes::router())
}
