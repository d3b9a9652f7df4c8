//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement. The team's billing state is checked later,
//! by the handler, because it needs the team row.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires an approved `coach` or `admin`. Rejects with 403 Forbidden
/// otherwise.
///
/// ```ignore
/// async fn toggle(RequireCoach(user): RequireCoach) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireCoach(pub AuthUser);

impl FromRequestParts<AppState> for RequireCoach {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.viewer(true).ensure_can_mutate()?;
        Ok(RequireCoach(user))
    }
}
