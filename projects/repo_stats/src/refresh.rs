use chrono::{Days, NaiveDate, Utc};
use interfaces_github_stats::{
    index::{FetchGitHubError, GitHubApi, PULLS_PER_PAGE},
    models::RepoId,
};
use thiserror::Error;
use tracing::info;

use crate::{
    context::AppContext,
    db::{
        snapshot::{replace_snapshot, PullRecord, ReplaceSnapshotError, ReplaceSummary, RepositorySnapshot},
        with_connection,
    },
};

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("MissingToken: GITHUB_TOKEN is not configured")]
    MissingToken,

    #[error("FetchGitHub: {source}")]
    FetchGitHub {
        #[from]
        source: FetchGitHubError,
    },

    #[error("CountOutOfRange: pull #{number} reports {value} changed lines")]
    CountOutOfRange { number: u64, value: u64 },

    #[error("GetConnectionFromPool: {source}")]
    GetConnectionFromPool {
        #[from]
        source: r2d2::Error,
    },

    #[error(transparent)]
    ReplaceSnapshot {
        #[from]
        source: ReplaceSnapshotError,
    },

    #[error("BlockingTask: {source}")]
    BlockingTask {
        #[from]
        source: tokio::task::JoinError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowDecision {
    /// Created today or later: the day is not over yet.
    Skip,
    Keep,
    /// Older than the window. Listings are newest first, so nothing after
    /// this can be kept either.
    Stop,
}

pub fn window_decision(created: NaiveDate, today: NaiveDate, window_days: u64) -> WindowDecision {
    let limit = today.checked_sub_days(Days::new(window_days)).unwrap_or(NaiveDate::MIN);
    if created >= today {
        WindowDecision::Skip
    } else if created >= limit {
        WindowDecision::Keep
    } else {
        WindowDecision::Stop
    }
}

/// Pull requests of `repo` created within the `window_days` days before
/// `today`, with their change counts.
pub async fn collect_recent_pulls(
    api: &GitHubApi,
    token: &str,
    repo: &RepoId,
    today: NaiveDate,
    window_days: u64,
) -> Result<RepositorySnapshot, RefreshError> {
    let mut numbers = Vec::new();

    'pages: for page in 1.. {
        let pulls = api.fetch_pulls_page(token, repo, page).await?;
        let page_len = pulls.len();

        for pull in pulls {
            match window_decision(pull.created_at.date_naive(), today, window_days) {
                WindowDecision::Skip => continue,
                WindowDecision::Keep => numbers.push(pull.number),
                WindowDecision::Stop => break 'pages,
            }
        }

        if page_len < PULLS_PER_PAGE {
            break;
        }
    }

    let mut pulls = Vec::with_capacity(numbers.len());
    for number in numbers {
        let detail = api.fetch_pull(token, repo, number).await?;
        let to_count = |value: u64| {
            i32::try_from(value).map_err(|_| RefreshError::CountOutOfRange { number, value })
        };

        pulls.push(PullRecord {
            created_date: detail.created_at.date_naive(),
            is_merged: detail.merged,
            additions: to_count(detail.additions)?,
            deletions: to_count(detail.deletions)?,
        });
    }

    Ok(RepositorySnapshot {
        name: repo.name.clone(),
        pulls,
    })
}

/// Replaces the stored repositories and pull requests with a fresh window of
/// upstream data for every configured repository.
pub async fn refresh_database(ctx: &AppContext) -> Result<ReplaceSummary, RefreshError> {
    let token = ctx.github_token.as_deref().ok_or(RefreshError::MissingToken)?;
    let today = Utc::now().date_naive();

    let mut snapshots = Vec::with_capacity(ctx.refresh.repositories.len());
    for repo in &ctx.refresh.repositories {
        let snapshot =
            collect_recent_pulls(&ctx.github, token, repo, today, ctx.refresh.window_days).await?;
        info!(repo = %repo, pulls = snapshot.pulls.len(), "collected recent pull requests");
        snapshots.push(snapshot);
    }

    let summary = with_connection(&ctx.pool, move |conn| {
        replace_snapshot(conn, &snapshots).map_err(RefreshError::from)
    })
    .await?;

    info!(
        repositories = summary.repositories,
        pull_requests = summary.pull_requests,
        "database refreshed"
    );
    Ok(summary)
}
