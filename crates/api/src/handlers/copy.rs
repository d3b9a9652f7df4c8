//! Handler for copying every entry of one meet into another.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use trackmeet_core::copy::{copy_all_from, CopyReport};
use trackmeet_core::types::DbId;

use super::context::{ensure_can_edit, load_entries, load_meet};
use crate::error::AppResult;
use crate::middleware::rbac::RequireCoach;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CopyRequest {
    pub source_meet_id: DbId,
}

#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub report: CopyReport,
    /// Set when nothing new was copied.
    pub notice: Option<&'static str>,
}

/// POST /api/v1/meets/{meet_id}/copy
///
/// Both meets must belong to the caller's team.
pub async fn copy_entries(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Path(meet_id): Path<DbId>,
    Json(input): Json<CopyRequest>,
) -> AppResult<impl IntoResponse> {
    load_meet(&state, &coach, meet_id).await?;
    load_meet(&state, &coach, input.source_meet_id).await?;
    ensure_can_edit(&state, &coach).await?;

    let mut target = load_entries(&state, meet_id).await?;
    let report = copy_all_from(&mut target, &*state.store(), input.source_meet_id).await?;

    tracing::info!(
        meet_id,
        source_meet_id = input.source_meet_id,
        added = report.added,
        user_id = coach.user_id,
        "Meet entries copied"
    );

    Ok(Json(DataResponse {
        data: CopyResponse {
            report,
            notice: report.is_noop().then_some("No new entries to copy"),
        },
    }))
}
