use interfaces_github_stats::index::GitHubApi;

use crate::{config::RefreshConfig, db::PgPool};

/// Everything a request handler needs, built once in `main` and handed to the
/// router as an extension.
#[derive(Clone)]
pub struct AppContext {
    pub pool: PgPool,
    pub github: GitHubApi,
    pub github_token: Option<String>,
    pub refresh: RefreshConfig,
}

impl AppContext {
    pub fn new(
        pool: PgPool,
        github: GitHubApi,
        github_token: Option<String>,
        refresh: RefreshConfig,
    ) -> Self {
        Self {
            pool,
            github,
            github_token,
            refresh,
        }
    }
}
