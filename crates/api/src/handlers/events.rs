//! Handlers for the event catalog and a meet's event board.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use trackmeet_core::activation::visible_events;
use trackmeet_core::athlete::Athlete;
use trackmeet_core::event::{CapacityStatus, TrackEvent};
use trackmeet_core::types::DbId;

use super::context::{
    ensure_can_edit, load_activation, load_catalog, load_entries, load_meet, load_roster,
    team_can_edit,
};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCoach;
use crate::response::DataResponse;
use crate::state::AppState;

/// One event column on a meet's entry board.
#[derive(Debug, Serialize)]
pub struct BoardEvent {
    #[serde(flatten)]
    pub event: TrackEvent,
    pub active: bool,
    pub entry_count: usize,
    pub capacity: CapacityStatus,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub event_id: DbId,
    pub active: bool,
}

/// GET /api/v1/events
pub async fn list_catalog(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let catalog = load_catalog(&state).await?;
    let events: Vec<TrackEvent> = catalog.sorted().into_iter().cloned().collect();

    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/meets/{meet_id}/events
///
/// Coaches also see inactive events, flagged `active: false`.
pub async fn list_for_meet(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(meet_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &auth, meet_id).await?;
    let billing_can_edit = team_can_edit(&state, auth.team_id).await?;
    let viewer = auth.viewer(billing_can_edit);

    let entries = load_entries(&state, meet_id).await?;
    let activation = load_activation(&state, meet_id).await?;

    let board: Vec<BoardEvent> = visible_events(entries.catalog(), activation.overlay(), &viewer)
        .into_iter()
        .map(|visible| {
            let entry_count = entries.by_event(visible.event.id).len();
            BoardEvent {
                event: visible.event.clone(),
                active: visible.active,
                entry_count,
                capacity: visible.event.capacity_status(entry_count),
            }
        })
        .collect();

    Ok(Json(DataResponse { data: board }))
}

/// POST /api/v1/meets/{meet_id}/events/{event_id}/toggle
///
/// Flip an event between active and inactive for this meet.
pub async fn toggle_event(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path((meet_id, event_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;
    load_catalog(&state).await?.require(event_id)?;

    let mut activation = load_activation(&state, meet_id).await?;
    let active = activation.toggle(event_id).await?;

    tracing::info!(meet_id, event_id, active, user_id = coach.user_id, "Event activation toggled");

    Ok(Json(DataResponse {
        data: ToggleResponse { event_id, active },
    }))
}

/// GET /api/v1/meets/{meet_id}/events/{event_id}/available
///
/// Active roster athletes eligible for the meet and not yet in the event.
pub async fn available_athletes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((meet_id, event_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    let meet = load_meet(&state, &auth, meet_id).await?;
    let entries = load_entries(&state, meet_id).await?;
    entries.catalog().require(event_id)?;
    let roster = load_roster(&state, auth.team_id).await?;

    let available: Vec<Athlete> = meet
        .available_athletes(&roster, |athlete_id| entries.contains(athlete_id, event_id))
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(DataResponse { data: available }))
}
