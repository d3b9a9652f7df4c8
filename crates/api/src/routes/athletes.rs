//! Route definitions for the team roster and bulk import.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::athletes;
use crate::state::AppState;

/// Roster routes mounted at `/athletes`.
///
/// ```text
/// GET    /                  -> list_roster
/// POST   /import/preview    -> preview_import
/// POST   /import            -> import_athletes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(athletes::list_roster))
        .route("/import/preview", post(athletes::preview_import))
        .route("/import", post(athletes::import_athletes))
}
