use std::time::Duration;

use reqwest::{
    header::{HeaderMap, LAST_MODIFIED, LINK},
    Client, RequestBuilder, Response, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    CodeFrequencyEntry, CommitActivityPayload, ContributorStatsPayload, PullDetailPayload,
    PullSummaryPayload, PunchCardEntry, RepoId, RepositoryPayload, UserPayload,
};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const PULLS_PER_PAGE: usize = 100;

const USER_AGENT: &str = "repo-stats-client";

#[derive(Debug, Error)]
pub enum FetchGitHubError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody { source: serde_json::Error },

    #[error("Unauthorized: credential rejected for {resource}")]
    Unauthorized { resource: String },

    #[error("NotFound: {resource}")]
    NotFound { resource: String },

    #[error("RateLimited: quota resets at {reset_at:?}")]
    RateLimited { reset_at: Option<u64> },

    #[error("StatsPending: {resource} is still being computed upstream")]
    StatsPending { resource: String },

    #[error("UnexpectedStatus: {status} for {resource}")]
    UnexpectedStatus { status: StatusCode, resource: String },

    #[error("GraphQL: {message}")]
    GraphQl { message: String },
}

impl FetchGitHubError {
    /// Whether the same call may succeed later without any change on our side.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchGitHubError::RateLimited { .. } | FetchGitHubError::StatsPending { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum BuildGitHubApiError {
    #[error("BuildClient: {source}")]
    BuildClient { source: reqwest::Error },
}

/// Repository resource along with its `Last-Modified` header.
#[derive(Debug, Clone)]
pub struct FetchedRepository {
    pub payload: RepositoryPayload,
    pub last_modified: Option<String>,
}

/// Shared HTTP client for the upstream API. Cheap to clone.
#[derive(Debug, Clone)]
pub struct GitHubApi {
    pub(crate) client: Client,
    pub(crate) base_url: String,
}

impl GitHubApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BuildGitHubApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| BuildGitHubApiError::BuildClient { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        token: &str,
        resource: &str,
    ) -> Result<Response, FetchGitHubError> {
        let response = request
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| FetchGitHubError::RequestSend { source })?;

        match classify_status(response.status(), response.headers(), resource) {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    async fn get(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Response, FetchGitHubError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GitHub GET");
        self.send(self.client.get(&url).query(query), token, path)
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchGitHubError> {
        let response = self.get(token, path, query).await?;
        read_json(response).await
    }

    /// Total size of a paginated listing, read from the `rel="last"` link of a
    /// one-item page.
    async fn count_items(
        &self,
        token: &str,
        path: &str,
        extra: &[(&str, String)],
    ) -> Result<u64, FetchGitHubError> {
        let mut query = vec![("per_page", "1".to_string())];
        query.extend_from_slice(extra);

        let response = self.get(token, path, &query).await?;
        let last_page = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(last_page_from_link);

        match last_page {
            Some(count) => Ok(count),
            None => {
                let items: Vec<serde_json::Value> = read_json(response).await?;
                Ok(items.len() as u64)
            }
        }
    }

    async fn fetch_stats<T: DeserializeOwned>(
        &self,
        token: &str,
        repo: &RepoId,
        stat: &str,
    ) -> Result<Vec<T>, FetchGitHubError> {
        let path = format!("/repos/{}/{}/stats/{stat}", repo.owner, repo.name);
        let response = self.get(token, &path, &[]).await?;

        match response.status() {
            StatusCode::ACCEPTED => Err(FetchGitHubError::StatsPending { resource: path }),
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            _ => read_json(response).await,
        }
    }

    pub async fn fetch_repository(
        &self,
        token: &str,
        repo: &RepoId,
    ) -> Result<FetchedRepository, FetchGitHubError> {
        let path = format!("/repos/{}/{}", repo.owner, repo.name);
        let response = self.get(token, &path, &[]).await?;
        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let payload = read_json(response).await?;

        Ok(FetchedRepository {
            payload,
            last_modified,
        })
    }

    pub async fn fetch_user(&self, token: &str, login: &str) -> Result<UserPayload, FetchGitHubError> {
        self.get_json(token, &format!("/users/{login}"), &[]).await
    }

    pub async fn count_contributors(&self, token: &str, repo: &RepoId) -> Result<u64, FetchGitHubError> {
        let path = format!("/repos/{}/{}/contributors", repo.owner, repo.name);
        self.count_items(token, &path, &[]).await
    }

    pub async fn count_commits(&self, token: &str, repo: &RepoId) -> Result<u64, FetchGitHubError> {
        let path = format!("/repos/{}/{}/commits", repo.owner, repo.name);
        self.count_items(token, &path, &[]).await
    }

    pub async fn count_open_pulls(&self, token: &str, repo: &RepoId) -> Result<u64, FetchGitHubError> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        self.count_items(token, &path, &[("state", "open".to_string())])
            .await
    }

    pub async fn fetch_stats_contributors(
        &self,
        token: &str,
        repo: &RepoId,
    ) -> Result<Vec<ContributorStatsPayload>, FetchGitHubError> {
        self.fetch_stats(token, repo, "contributors").await
    }

    pub async fn fetch_stats_commit_activity(
        &self,
        token: &str,
        repo: &RepoId,
    ) -> Result<Vec<CommitActivityPayload>, FetchGitHubError> {
        self.fetch_stats(token, repo, "commit_activity").await
    }

    pub async fn fetch_stats_code_frequency(
        &self,
        token: &str,
        repo: &RepoId,
    ) -> Result<Vec<CodeFrequencyEntry>, FetchGitHubError> {
        self.fetch_stats(token, repo, "code_frequency").await
    }

    pub async fn fetch_stats_punch_card(
        &self,
        token: &str,
        repo: &RepoId,
    ) -> Result<Vec<PunchCardEntry>, FetchGitHubError> {
        self.fetch_stats(token, repo, "punch_card").await
    }

    /// One page of pull requests in every state, newest first. Pages start at 1.
    pub async fn fetch_pulls_page(
        &self,
        token: &str,
        repo: &RepoId,
        page: u32,
    ) -> Result<Vec<PullSummaryPayload>, FetchGitHubError> {
        let path = format!("/repos/{}/{}/pulls", repo.owner, repo.name);
        let query = [
            ("state", "all".to_string()),
            ("sort", "created".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", PULLS_PER_PAGE.to_string()),
            ("page", page.to_string()),
        ];
        self.get_json(token, &path, &query).await
    }

    pub async fn fetch_pull(
        &self,
        token: &str,
        repo: &RepoId,
        number: u64,
    ) -> Result<PullDetailPayload, FetchGitHubError> {
        let path = format!("/repos/{}/{}/pulls/{number}", repo.owner, repo.name);
        self.get_json(token, &path, &[]).await
    }
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, FetchGitHubError> {
    let body = response
        .text()
        .await
        .map_err(|source| FetchGitHubError::ResponseRead { source })?;

    serde_json::from_str(&body).map_err(|source| FetchGitHubError::DeserializeResponseBody { source })
}

/// Maps a non-success upstream status onto the error taxonomy.
pub fn classify_status(
    status: StatusCode,
    headers: &HeaderMap,
    resource: &str,
) -> Option<FetchGitHubError> {
    let resource = resource.to_string();
    match status {
        s if s.is_success() => None,
        StatusCode::UNAUTHORIZED => Some(FetchGitHubError::Unauthorized { resource }),
        StatusCode::NOT_FOUND => Some(FetchGitHubError::NotFound { resource }),
        StatusCode::TOO_MANY_REQUESTS => Some(FetchGitHubError::RateLimited {
            reset_at: header_u64(headers, "x-ratelimit-reset"),
        }),
        StatusCode::FORBIDDEN if header_u64(headers, "x-ratelimit-remaining") == Some(0) => {
            Some(FetchGitHubError::RateLimited {
                reset_at: header_u64(headers, "x-ratelimit-reset"),
            })
        }
        status => Some(FetchGitHubError::UnexpectedStatus { status, resource }),
    }
}

pub(crate) fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Page number of the `rel="last"` target in a `Link` header.
pub fn last_page_from_link(link: &str) -> Option<u64> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|param| param.trim() == r#"rel="last""#) {
            return None;
        }

        let target = target.trim().trim_start_matches('<').trim_end_matches('>');
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}
