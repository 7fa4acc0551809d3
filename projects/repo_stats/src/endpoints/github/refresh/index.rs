use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::{
    context::AppContext,
    endpoints::error_response,
    refresh::{refresh_database, RefreshError},
};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Refresh: {source}")]
    Refresh {
        #[from]
        source: RefreshError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let HandlerError::Refresh { source } = &self;
        let (status, message) = match source {
            RefreshError::MissingToken => (StatusCode::SERVICE_UNAVAILABLE, "refresh is not configured"),
            RefreshError::FetchGitHub { source } if source.is_retryable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream temporarily unavailable",
            ),
            RefreshError::FetchGitHub { .. } | RefreshError::CountOutOfRange { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream request failed")
            }
            RefreshError::GetConnectionFromPool { .. }
            | RefreshError::ReplaceSnapshot { .. }
            | RefreshError::BlockingTask { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        error!(error = %self, %status, "POST /github/refresh failed");
        error_response(status, message)
    }
}

/// Axum handler: POST /github/refresh
pub async fn handler(Extension(ctx): Extension<AppContext>) -> Result<impl IntoResponse, HandlerError> {
    refresh_database(&ctx).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "DB Refreshed" })),
    ))
}
