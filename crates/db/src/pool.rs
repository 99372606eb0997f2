//! Postgres connection pool for the folder service.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

/// Shared pool handed to every repository function.
pub type DbPool = PgPool;

/// How long a request waits for a free connection before giving up.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connect to `database_url` with at most `max_connections` open connections.
///
/// Folder listings with the fan-out count strategy hold one connection per
/// row of the page while counts are in flight, so the ceiling bounds how many
/// listings can run side by side.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!(max_connections, acquire_timeout = ?ACQUIRE_TIMEOUT, "connecting to database");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the embedded migrations from the workspace `migrations/` directory:
/// the `folders` table with its per-project unique display name and keyset
/// index, and the `folder_id` / `project_id` columns of `flows` that flow
/// counts read.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("applying folder and flow migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
