//! Handlers for a meet's entries: assignment, corrections, removal and moves.
//!
//! Every mutation goes through [`EntryStore`], so rule checks run before
//! anything is persisted. A `Tentative` outcome is reconciled before the
//! response is chosen.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use trackmeet_core::assignment::{AssignRequest, RelayLegCounter};
use trackmeet_core::drag::MoveIntent;
use trackmeet_core::entry::{EntryPatch, MeetEntry, RelayTeam};
use trackmeet_core::entry_store::{BatchRejection, BatchReport, EntryStore, MutationOutcome};
use trackmeet_core::error::CoreError;
use trackmeet_core::moves::execute_move;
use trackmeet_core::types::DbId;
use validator::Validate;

use super::context::{
    ensure_can_edit, ensure_on_roster, load_activation, load_entries, load_meet, load_roster,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCoach;
use crate::response::DataResponse;
use crate::state::AppState;

/// Code reported for batch athletes outside the caller's active roster.
pub const NOT_ON_ROSTER: &str = "NOT_ON_ROSTER";

#[derive(Debug, Serialize)]
pub struct EventEntries {
    pub event_id: DbId,
    pub entries: Vec<MeetEntry>,
}

/// Body of `POST /meets/{meet_id}/entries`.
#[derive(Debug, Deserialize)]
pub struct AssignEntryRequest {
    pub event_id: DbId,
    pub athlete_id: DbId,
    pub relay_team: Option<RelayTeam>,
    /// Explicit leg; when absent a relay entry takes the squad's next leg.
    pub relay_leg: Option<i16>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchAssignRequest {
    pub event_id: DbId,
    #[validate(length(min = 1, message = "At least one athlete is required"))]
    pub athlete_ids: Vec<DbId>,
    pub relay_team: Option<RelayTeam>,
}

#[derive(Debug, Serialize)]
pub struct BatchAssignResponse {
    pub added: Vec<MeetEntry>,
    pub rejected: Vec<BatchRejection>,
}

#[derive(Debug, Deserialize)]
pub struct MoveEntryRequest {
    /// The event the client saw the entry in; a mismatch is a conflict.
    pub source_event_id: Option<DbId>,
    pub target_event_id: DbId,
}

fn entry_denied(entry_id: DbId) -> AppError {
    AppError::Core(CoreError::Forbidden(format!(
        "Entry {entry_id} could not be changed"
    )))
}

/// GET /api/v1/meets/{meet_id}/entries
///
/// Entries grouped per event; relay entries ordered by squad then leg.
pub async fn list_entries(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(meet_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &auth, meet_id).await?;
    let store = load_entries(&state, meet_id).await?;

    let groups: Vec<EventEntries> = store
        .grouped_by_event()
        .into_iter()
        .map(|(event_id, entries)| EventEntries {
            event_id,
            entries: entries.into_iter().cloned().collect(),
        })
        .collect();

    Ok(Json(DataResponse { data: groups }))
}

/// POST /api/v1/meets/{meet_id}/entries
///
/// Assign one athlete to one event.
pub async fn create_entry(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path(meet_id): Path<DbId>,
    Json(input): Json<AssignEntryRequest>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;
    ensure_on_roster(&state, coach.team_id, input.athlete_id).await?;

    let mut store = load_entries(&state, meet_id).await?;
    let activation = load_activation(&state, meet_id).await?;
    let options = &state.config.assignment;

    let entry = match input.relay_leg {
        Some(relay_leg) => {
            let request = AssignRequest {
                relay_team: input.relay_team,
                relay_leg: Some(relay_leg),
                ..AssignRequest::new(input.athlete_id)
            };
            store
                .assign(input.event_id, &request, activation.overlay(), options)
                .await?
        }
        None => {
            let mut counter = next_leg_counter(&store, input.event_id, input.relay_team)?;
            store
                .assign_single(
                    input.event_id,
                    input.athlete_id,
                    input.relay_team,
                    &mut counter,
                    activation.overlay(),
                    options,
                )
                .await?
        }
    };

    tracing::info!(
        meet_id,
        entry_id = entry.id,
        athlete_id = entry.athlete_id,
        event_id = entry.event_id,
        user_id = coach.user_id,
        "Entry created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// Leg counter resumed after the squad's existing entries.
fn next_leg_counter(
    store: &EntryStore,
    event_id: DbId,
    relay_team: Option<RelayTeam>,
) -> Result<RelayLegCounter, CoreError> {
    let event = store.catalog().require(event_id)?;
    let counter = match relay_team.or_else(|| event.default_relay_team()) {
        Some(team) => RelayLegCounter::resume_from(store.squad_size(event_id, team)),
        None => RelayLegCounter::new(),
    };
    Ok(counter)
}

/// POST /api/v1/meets/{meet_id}/entries/batch
///
/// Select-all assignment into one event. Each athlete is decided on its own;
/// rejections are reported next to the created entries.
pub async fn assign_batch(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path(meet_id): Path<DbId>,
    Json(input): Json<BatchAssignRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;

    let roster: HashSet<DbId> = load_roster(&state, coach.team_id)
        .await?
        .into_iter()
        .map(|a| a.id)
        .collect();
    let (on_roster, off_roster): (Vec<DbId>, Vec<DbId>) = input
        .athlete_ids
        .into_iter()
        .partition(|id| roster.contains(id));

    let mut store = load_entries(&state, meet_id).await?;
    let activation = load_activation(&state, meet_id).await?;

    let report = if on_roster.is_empty() {
        BatchReport::default()
    } else {
        store
            .assign_batch(
                input.event_id,
                &on_roster,
                input.relay_team,
                activation.overlay(),
                &state.config.assignment,
            )
            .await?
    };

    let mut rejected = report.rejected;
    rejected.extend(off_roster.into_iter().map(|athlete_id| BatchRejection {
        athlete_id,
        code: NOT_ON_ROSTER,
        message: format!("Athlete {athlete_id} is not on the active roster"),
    }));

    Ok(Json(DataResponse {
        data: BatchAssignResponse {
            added: report.added,
            rejected,
        },
    }))
}

/// PATCH /api/v1/meets/{meet_id}/entries/{id}
///
/// Correct a relay entry's leg or squad.
pub async fn update_entry(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path((meet_id, entry_id)): Path<(DbId, DbId)>,
    Json(patch): Json<EntryPatch>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;

    let mut store = load_entries(&state, meet_id).await?;
    let (entry, outcome) = store.update(entry_id, &patch).await?;

    if outcome == MutationOutcome::Tentative {
        store.reconcile().await?;
        return Err(match store.get(entry_id) {
            Some(_) => entry_denied(entry_id),
            None => AppError::Core(CoreError::NotFound {
                entity: "MeetEntry",
                id: entry_id,
            }),
        });
    }

    tracing::info!(meet_id, entry_id, user_id = coach.user_id, "Entry updated");

    Ok(Json(DataResponse { data: entry }))
}

/// DELETE /api/v1/meets/{meet_id}/entries/{id}
pub async fn delete_entry(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path((meet_id, entry_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;

    let mut store = load_entries(&state, meet_id).await?;
    let outcome = store.remove(entry_id).await?;

    if outcome == MutationOutcome::Tentative {
        store.reconcile().await?;
        if store.get(entry_id).is_some() {
            return Err(entry_denied(entry_id));
        }
    }

    tracing::info!(meet_id, entry_id, user_id = coach.user_id, "Entry deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/meets/{meet_id}/entries/{id}/move
///
/// Move an entry to another event: validate the target, remove, then add.
pub async fn move_entry(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path((meet_id, entry_id)): Path<(DbId, DbId)>,
    Json(input): Json<MoveEntryRequest>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    ensure_can_edit(&state, &coach).await?;

    let mut store = load_entries(&state, meet_id).await?;
    let entry = store
        .get(entry_id)
        .cloned()
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MeetEntry",
            id: entry_id,
        }))?;
    let intent = MoveIntent {
        source_event_id: input.source_event_id.unwrap_or(entry.event_id),
        target_event_id: input.target_event_id,
        entry,
    };

    let activation = load_activation(&state, meet_id).await?;
    let result = execute_move(
        &mut store,
        &intent,
        activation.overlay(),
        &state.config.assignment,
    )
    .await;

    // A denied remove has already been reconciled and nothing was added.
    let outcome = match result {
        Err(CoreError::Forbidden(reason)) => {
            tracing::warn!(meet_id, entry_id, user_id = coach.user_id, %reason, "Move denied");
            return Err(entry_denied(entry_id));
        }
        other => other?,
    };
    if store.needs_reconcile() {
        store.reconcile().await?;
    }

    tracing::info!(meet_id, entry_id, user_id = coach.user_id, "Entry move handled");

    Ok(Json(DataResponse { data: outcome }))
}
