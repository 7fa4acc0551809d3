pub mod pull;
pub mod repository;
pub mod schema;
pub mod snapshot;

use std::time::Duration;

use diesel::r2d2::{ConnectionManager, Pool};
use diesel::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use thiserror::Error;

pub type PgPool = Pool<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Debug, Error)]
pub enum BuildPoolError {
    #[error("BuildPool: {source}")]
    BuildPool {
        #[from]
        source: r2d2::Error,
    },
}

/// Idle connections opened eagerly by `build_pool`. The rest are opened on
/// demand up to the r2d2 default `max_size`.
pub const MIN_IDLE_CONNECTIONS: u32 = 1;

/// Builds the pool and opens one connection so a bad database config fails
/// at startup.
pub fn build_pool(database_url: &str, connection_timeout: Duration) -> Result<PgPool, BuildPoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .min_idle(Some(MIN_IDLE_CONNECTIONS))
        .connection_timeout(connection_timeout)
        .build(manager)
        .map_err(|source| BuildPoolError::BuildPool { source })
}

#[derive(Debug, Error)]
pub enum RunMigrationsError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error("RunPendingMigrations: {message}")]
    RunPendingMigrations { message: String },
}

/// Applies the embedded migrations, returning how many were pending.
pub fn run_migrations(pool: &PgPool) -> Result<usize, RunMigrationsError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| RunMigrationsError::RunPendingMigrations {
            message: err.to_string(),
        })?;

    Ok(applied.len())
}

/// Runs blocking diesel work on a pooled connection off the async runtime.
pub async fn with_connection<T, E, F>(pool: &PgPool, work: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<r2d2::Error> + From<tokio::task::JoinError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        work(&mut conn)
    })
    .await?
}
