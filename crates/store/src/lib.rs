//! Record store and per-entity repositories for the Amparo console.
//!
//! The store itself is a namespaced document service: flat JSON records
//! under per-organization collections, addressed by id. Repositories
//! wrap it with typed read/write per entity plus the fetch-time
//! consistency rules (registration expiration, campaign deactivation).

use sqlx::postgres::PgPoolOptions;

pub mod repositories;
pub mod session;
pub mod store;

pub use session::OrgContext;
pub use store::{Collection, MemStore, PgStore, RecordStore, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from the crate's `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
