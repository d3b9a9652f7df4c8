//! Loading shared by the meet handlers: tenant-checked meets, billing gate,
//! and the core stores built over [`PgStore`](trackmeet_db::PgStore).

use std::sync::Arc;

use chrono::Utc;
use trackmeet_core::activation::ActivationStore;
use trackmeet_core::athlete::Athlete;
use trackmeet_core::entry_store::EntryStore;
use trackmeet_core::error::CoreError;
use trackmeet_core::event::EventCatalog;
use trackmeet_core::meet::Meet;
use trackmeet_core::types::DbId;
use trackmeet_db::repositories::{AthleteRepo, MeetRepo, TeamRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Fetch a meet and reject it unless it belongs to the caller's team.
pub async fn load_meet(state: &AppState, user: &AuthUser, meet_id: DbId) -> AppResult<Meet> {
    let row = MeetRepo::find_by_id(&state.pool, meet_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Meet",
            id: meet_id,
        }))?;
    let meet = Meet::try_from(row)?;
    meet.ensure_owned_by(user.team_id)?;
    Ok(meet)
}

/// Whether the caller's team subscription currently allows edits.
pub async fn team_can_edit(state: &AppState, team_id: DbId) -> AppResult<bool> {
    let team = TeamRepo::find_by_id(&state.pool, team_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Team",
            id: team_id,
        }))?;
    Ok(team.can_edit(Utc::now()))
}

/// Full mutation gate: role, approval and billing.
pub async fn ensure_can_edit(state: &AppState, user: &AuthUser) -> AppResult<()> {
    let billing_can_edit = team_can_edit(state, user.team_id).await?;
    user.viewer(billing_can_edit).ensure_can_mutate()?;
    Ok(())
}

pub async fn load_catalog(state: &AppState) -> AppResult<Arc<EventCatalog>> {
    Ok(Arc::new(state.store().load_catalog().await?))
}

pub async fn load_entries(state: &AppState, meet_id: DbId) -> AppResult<EntryStore> {
    let catalog = load_catalog(state).await?;
    Ok(EntryStore::load(state.store(), catalog, meet_id).await?)
}

pub async fn load_activation(state: &AppState, meet_id: DbId) -> AppResult<ActivationStore> {
    Ok(ActivationStore::load(state.store(), meet_id).await?)
}

/// The team's active roster.
pub async fn load_roster(state: &AppState, team_id: DbId) -> AppResult<Vec<Athlete>> {
    let rows = AthleteRepo::list_by_team(&state.pool, team_id, true).await?;
    let roster = rows
        .into_iter()
        .map(Athlete::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(roster)
}

/// Reject athletes that are not on the team's active roster.
pub async fn ensure_on_roster(state: &AppState, team_id: DbId, athlete_id: DbId) -> AppResult<()> {
    let athlete = AthleteRepo::find_by_id(&state.pool, athlete_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Athlete",
            id: athlete_id,
        }))?;
    if athlete.team_id != team_id {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Athlete {athlete_id} is not on this team"
        ))));
    }
    if !athlete.active {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Athlete {athlete_id} is inactive"
        ))));
    }
    Ok(())
}
