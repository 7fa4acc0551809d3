use std::time::Duration;

use axum::serve;
use interfaces_github_stats::index::{BuildGitHubApiError, GitHubApi};
use projects_repo_stats::{
    config::{Config, ConfigError},
    context::AppContext,
    db::{build_pool, run_migrations, BuildPoolError, RunMigrationsError},
    router::build_router,
};
use thiserror::Error;
use tracing::info;
use utils_trace::tracing_init;

const DB_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum MainError {
    #[error("LoadConfig: {source}")]
    LoadConfig {
        #[source]
        source: ConfigError,
    },
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },
    #[error("BuildPool: {source}")]
    BuildPool {
        #[source]
        source: BuildPoolError,
    },
    #[error("RunMigrations: {source}")]
    RunMigrations {
        #[source]
        source: RunMigrationsError,
    },
    #[error("BuildGitHubApi: {source}")]
    BuildGitHubApi {
        #[source]
        source: BuildGitHubApiError,
    },
    #[error("TcpListenerBind: {source}")]
    TcpListenerBind {
        #[source]
        source: std::io::Error,
    },
    #[error("Serve: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },
}

#[tokio::main]
async fn main() -> Result<(), MainError> {
    let config = Config::from_env().map_err(|source| MainError::LoadConfig { source })?;

    tracing_init(config.log_level()).map_err(|source| MainError::TracingInit { source })?;

    let pool = build_pool(&config.database.connection_string(), DB_CONNECTION_TIMEOUT)
        .map_err(|source| MainError::BuildPool { source })?;
    let applied = run_migrations(&pool).map_err(|source| MainError::RunMigrations { source })?;
    info!(applied, "database migrations up to date");

    let github = GitHubApi::new(&config.github.api_url, config.github.timeout)
        .map_err(|source| MainError::BuildGitHubApi { source })?;

    let ctx = AppContext::new(pool, github, config.github.token.clone(), config.refresh.clone());
    let app = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(config.server_addr)
        .await
        .map_err(|source| MainError::TcpListenerBind { source })?;

    info!("Server running on addr: {}", config.server_addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|source| MainError::Serve { source })?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
