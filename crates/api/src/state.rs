use std::sync::Arc;

use trackmeet_db::PgStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the pool and config are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: trackmeet_db::DbPool,
    /// Server configuration, including the assignment rule options.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// The pool wrapped as the core persistence adapter.
    pub fn store(&self) -> Arc<PgStore> {
        Arc::new(PgStore::new(self.pool.clone()))
    }
}
