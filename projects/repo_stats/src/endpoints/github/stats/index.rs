use axum::{
    extract::{Extension, Json},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::{
    context::AppContext,
    endpoints::{error_response, JsonBody},
    stats::{
        daily_commits::{daily_commits, DailyCommits},
        repository_summary::{repository_summary, RepositorySummary},
        top_contributors::{top_contributors, TopContributors},
        yearly_code_frequency::yearly_code_frequency,
        yearly_commit_activity::yearly_commit_activity,
        StatsError,
    },
};

/// JSON payload shared by every stats endpoint.
#[derive(Deserialize)]
pub struct RepoQuery {
    token: String,
    full_name: String,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Stats: {source}")]
    Stats {
        #[from]
        source: StatsError,
    },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let HandlerError::Stats { source } = &self;
        let (status, message) = match source {
            StatsError::InvalidIdentifier { .. } => {
                (StatusCode::BAD_REQUEST, "full_name must look like owner/name")
            }
            StatsError::FetchGitHub { source } if source.is_retryable() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "upstream statistics temporarily unavailable",
            ),
            StatsError::FetchGitHub { .. }
            | StatsError::InsufficientData { .. }
            | StatsError::InvalidTimestamp { .. }
            | StatsError::InvalidDayIndex { .. } => {
                (StatusCode::BAD_GATEWAY, "upstream request failed")
            }
            StatsError::SerializeResult { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        };

        if status.is_server_error() {
            error!(error = %self, %status, "stats request failed");
        } else {
            warn!(error = %self, %status, "stats request rejected");
        }
        error_response(status, message)
    }
}

/// Axum handler: POST /github/stats/summary
pub async fn summary_handler(
    Extension(ctx): Extension<AppContext>,
    JsonBody(input): JsonBody<RepoQuery>,
) -> Result<Json<RepositorySummary>, HandlerError> {
    let summary = repository_summary(&ctx.github, &input.token, &input.full_name).await?;
    Ok(Json(summary))
}

/// Axum handler: POST /github/stats/contributors
pub async fn contributors_handler(
    Extension(ctx): Extension<AppContext>,
    JsonBody(input): JsonBody<RepoQuery>,
) -> Result<Json<TopContributors>, HandlerError> {
    let contributors = top_contributors(&ctx.github, &input.token, &input.full_name).await?;
    Ok(Json(contributors))
}

/// Axum handler: POST /github/stats/commit_activity
pub async fn commit_activity_handler(
    Extension(ctx): Extension<AppContext>,
    JsonBody(input): JsonBody<RepoQuery>,
) -> Result<Response, HandlerError> {
    let json = yearly_commit_activity(&ctx.github, &input.token, &input.full_name).await?;
    Ok(json_text(json))
}

/// Axum handler: POST /github/stats/code_frequency
pub async fn code_frequency_handler(
    Extension(ctx): Extension<AppContext>,
    JsonBody(input): JsonBody<RepoQuery>,
) -> Result<Response, HandlerError> {
    let json = yearly_code_frequency(&ctx.github, &input.token, &input.full_name).await?;
    Ok(json_text(json))
}

/// Axum handler: POST /github/stats/daily_commits
pub async fn daily_commits_handler(
    Extension(ctx): Extension<AppContext>,
    JsonBody(input): JsonBody<RepoQuery>,
) -> Result<Json<DailyCommits>, HandlerError> {
    let daily = daily_commits(&ctx.github, &input.token, &input.full_name).await?;
    Ok(Json(daily))
}

fn json_text(json: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        json,
    )
        .into_response()
}
