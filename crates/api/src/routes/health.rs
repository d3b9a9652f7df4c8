//! `GET /health`: liveness plus whether the board can actually be served.
//!
//! The entry board is useless without the seeded event catalog, so a
//! reachable database with an empty catalog reports `unseeded` rather than
//! `ok`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use trackmeet_db::SchemaStatus;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Unseeded,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Latest applied migration; `None` when unknown.
    pub schema_version: Option<i64>,
    pub catalog_events: Option<i64>,
}

impl HealthResponse {
    fn from_schema(schema: Option<SchemaStatus>) -> Self {
        let status = match schema {
            None => HealthStatus::Degraded,
            Some(s) if s.catalog_events == 0 => HealthStatus::Unseeded,
            Some(_) => HealthStatus::Ok,
        };
        Self {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy: schema.is_some(),
            schema_version: schema.and_then(|s| s.schema_version),
            catalog_events: schema.map(|s| s.catalog_events),
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let schema = match trackmeet_db::schema_status(&state.pool).await {
        Ok(schema) => Some(schema),
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not read schema status");
            None
        }
    };
    Json(HealthResponse::from_schema(schema))
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
