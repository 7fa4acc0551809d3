use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::{context::AppContext, endpoints};

pub fn build_router(ctx: AppContext) -> Router {
    use crate::endpoints::github::{pull, refresh, repo, stats};

    Router::new()
        .route("/health", get(endpoints::health::index::handler))
        .route("/github/repo/", get(repo::read_all::index::handler))
        .route("/github/pull/", get(pull::read_all::index::handler))
        .route("/github/pull/{repo_name}", get(pull::read_by_repo::index::handler))
        .route("/github/stats/summary", post(stats::index::summary_handler))
        .route("/github/stats/contributors", post(stats::index::contributors_handler))
        .route("/github/stats/commit_activity", post(stats::index::commit_activity_handler))
        .route("/github/stats/code_frequency", post(stats::index::code_frequency_handler))
        .route("/github/stats/daily_commits", post(stats::index::daily_commits_handler))
        .route("/github/refresh", post(refresh::index::handler))
        .layer(Extension(ctx))
}
