//! PostgreSQL persistence for track meets.
//!
//! Row models in [`models`], zero-sized repositories in [`repositories`], and
//! [`PgStore`], the adapter that lets the core stores run against the pool.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// What `/health` reports about the schema behind the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaStatus {
    /// Latest successfully applied migration, if any ran.
    pub schema_version: Option<i64>,
    /// Rows in the shared event catalog; zero means the seed is missing.
    pub catalog_events: i64,
}

pub async fn schema_status(pool: &DbPool) -> Result<SchemaStatus, sqlx::Error> {
    let schema_version: Option<i64> =
        sqlx::query_scalar("SELECT MAX(version) FROM _sqlx_migrations WHERE success")
            .fetch_one(pool)
            .await?;
    let catalog_events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM track_events")
        .fetch_one(pool)
        .await?;
    Ok(SchemaStatus {
        schema_version,
        catalog_events,
    })
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
