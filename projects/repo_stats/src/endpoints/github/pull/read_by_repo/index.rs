use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::{
    context::AppContext,
    db::{
        pull::{models::PullRequestView, queries::get_pull_requests_by_repository_name},
        with_connection,
    },
    endpoints::error_response,
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },
    #[error(transparent)]
    GetPullRequestsByRepositoryName {
        #[from]
        source: crate::db::pull::queries::GetPullRequestsByRepositoryNameError,
    },
    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "GET /github/pull/{{repo_name}} failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

/// Axum handler: GET /github/pull/{repo_name}
///
/// An unknown repository name yields an empty list, not a 404.
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
    Path(repo_name): Path<String>,
) -> Result<Json<Vec<PullRequestView>>, HandlerError> {
    let rows = with_connection(&ctx.pool, move |conn| {
        get_pull_requests_by_repository_name(conn, &repo_name).map_err(HandlerError::from)
    })
    .await?;

    Ok(Json(rows.into_iter().map(PullRequestView::from).collect()))
}
