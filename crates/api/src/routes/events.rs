//! Route definitions for the event catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Catalog routes mounted at `/events`.
///
/// ```text
/// GET    /                  -> list_catalog
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(events::list_catalog))
}
