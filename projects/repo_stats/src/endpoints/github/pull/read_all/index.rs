use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use thiserror::Error;
use tracing::error;

use crate::{
    context::AppContext,
    db::{
        pull::{models::PullRequestView, queries::get_all_pull_requests},
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
    GetAllPullRequests {
        #[from]
        source: crate::db::pull::queries::GetAllPullRequestsError,
    },
    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "GET /github/pull/ failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

/// Axum handler: GET /github/pull/
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
) -> Result<Json<Vec<PullRequestView>>, HandlerError> {
    let rows = with_connection(&ctx.pool, |conn| {
        get_all_pull_requests(conn).map_err(HandlerError::from)
    })
    .await?;

    Ok(Json(rows.into_iter().map(PullRequestView::from).collect()))
}
