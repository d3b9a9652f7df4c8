//! Handlers for the team roster and pasted-text bulk import.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use trackmeet_core::import::{self, ImportDefaults};
use validator::Validate;

use super::context::{ensure_can_edit, load_roster};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireCoach;
use crate::response::DataResponse;
use crate::state::AppState;

/// Pasted roster text, one athlete per line.
#[derive(Debug, Deserialize, Validate)]
pub struct ImportRequest {
    #[validate(length(min = 1, max = 1000000, message = "Paste at least one line"))]
    pub text: String,
    /// Applied to rows without a level or gender column.
    pub defaults: Option<ImportDefaults>,
}

impl ImportRequest {
    fn rows(&self) -> Vec<import::ParsedRow> {
        import::parse_with(&self.text, &self.defaults.unwrap_or_default())
    }
}

/// GET /api/v1/athletes
pub async fn list_roster(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let roster = load_roster(&state, auth.team_id).await?;

    Ok(Json(DataResponse { data: roster }))
}

/// POST /api/v1/athletes/import/preview
///
/// Parse without saving. Rows that cannot be imported carry an `error`.
pub async fn preview_import(
    _auth: AuthUser,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    Ok(Json(DataResponse { data: input.rows() }))
}

/// POST /api/v1/athletes/import
///
/// Parse and create every valid row. Failed rows do not stop the rest.
pub async fn import_athletes(
    RequireCoach(coach): RequireCoach,
    State(state): State<AppState>,
    Json(input): Json<ImportRequest>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    ensure_can_edit(&state, &coach).await?;

    let rows = input.rows();
    let store = state.store();
    let report = import::submit(&rows, coach.team_id, &*store).await;

    tracing::info!(
        team_id = coach.team_id,
        parsed = rows.len(),
        created = report.created.len(),
        failed = report.failed.len(),
        user_id = coach.user_id,
        "Athletes imported"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}
