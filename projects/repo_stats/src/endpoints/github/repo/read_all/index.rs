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
        repository::{models::Repository, queries::get_all_repositories},
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
    GetAllRepositories {
        #[from]
        source: crate::db::repository::queries::GetAllRepositoriesError,
    },
    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> axum::response::Response {
        error!(error = %self, "GET /github/repo/ failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

/// Axum handler: GET /github/repo/
pub async fn handler(
    Extension(ctx): Extension<AppContext>,
) -> Result<Json<Vec<Repository>>, HandlerError> {
    let repositories = with_connection(&ctx.pool, |conn| {
        get_all_repositories(conn).map_err(HandlerError::from)
    })
    .await?;

    Ok(Json(repositories))
}
