use interfaces_github_stats::{
    index::{FetchedRepository, GitHubApi},
    models::RepoId,
};
use serde::Serialize;

use super::StatsError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerProfile {
    pub avatar_url: String,
    pub gh_url: String,
    pub name: Option<String>,
    pub login: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryCounters {
    /// Subscriber count.
    pub watchers: u64,
    /// Upstream `watchers_count`, which is the star count.
    pub stars: u64,
    pub forks: u64,
    pub full_name: String,
    pub description: Option<String>,
    pub homepage_url: Option<String>,
    pub languages_url: String,
    /// `Last-Modified` header of the repository resource.
    pub updated: Option<String>,
    pub contributors: u64,
    pub total_commits: u64,
    pub open_pull_requests: u64,
}

/// Serializes as a two-element array: owner first, counters second.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary(pub OwnerProfile, pub RepositoryCounters);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingTotals {
    pub contributors: u64,
    pub total_commits: u64,
    pub open_pull_requests: u64,
}

pub fn summarize(
    fetched: FetchedRepository,
    owner_name: Option<String>,
    totals: ListingTotals,
) -> RepositorySummary {
    let FetchedRepository {
        payload,
        last_modified,
    } = fetched;

    let owner = OwnerProfile {
        avatar_url: payload.owner.avatar_url,
        gh_url: payload.owner.url,
        name: owner_name,
        login: payload.owner.login,
    };

    let counters = RepositoryCounters {
        watchers: payload.subscribers_count,
        stars: payload.watchers_count,
        forks: payload.forks_count,
        full_name: payload.full_name,
        description: payload.description,
        homepage_url: payload.homepage,
        languages_url: payload.languages_url,
        updated: last_modified,
        contributors: totals.contributors,
        total_commits: totals.total_commits,
        open_pull_requests: totals.open_pull_requests,
    };

    RepositorySummary(owner, counters)
}

pub async fn repository_summary(
    api: &GitHubApi,
    token: &str,
    full_name: &str,
) -> Result<RepositorySummary, StatsError> {
    let repo: RepoId = full_name.parse()?;
    let fetched = api.fetch_repository(token, &repo).await?;

    let (owner, contributors, total_commits, open_pull_requests) = tokio::try_join!(
        api.fetch_user(token, &fetched.payload.owner.login),
        api.count_contributors(token, &repo),
        api.count_commits(token, &repo),
        api.count_open_pulls(token, &repo),
    )?;

    Ok(summarize(
        fetched,
        owner.name,
        ListingTotals {
            contributors,
            total_commits,
            open_pull_requests,
        },
    ))
}

#[cfg(test)]
mod tests {
    use interfaces_github_stats::models::RepositoryPayload;

    use super::*;

    #[test]
    fn serializes_as_owner_then_counters() {
        let payload: RepositoryPayload = serde_json::from_value(serde_json::json!({
            "name": "spark",
            "full_name": "apache/spark",
            "description": "Unified analytics engine",
            "homepage": "https://spark.apache.org/",
            "languages_url": "https://api.github.com/repos/apache/spark/languages",
            "subscribers_count": 2000,
            "watchers_count": 38000,
            "forks_count": 28000,
            "owner": {
                "login": "apache",
                "avatar_url": "https://avatars.githubusercontent.com/u/47359",
                "url": "https://api.github.com/users/apache"
            }
        }))
        .unwrap();

        let summary = summarize(
            FetchedRepository {
                payload,
                last_modified: Some("Tue, 01 Oct 2024 12:00:00 GMT".to_string()),
            },
            Some("The Apache Software Foundation".to_string()),
            ListingTotals {
                contributors: 2100,
                total_commits: 45000,
                open_pull_requests: 230,
            },
        );

        let json = serde_json::to_value(&summary).unwrap();
        let parts = json.as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["login"], "apache");
        assert_eq!(parts[0]["name"], "The Apache Software Foundation");
        assert_eq!(parts[0]["gh_url"], "https://api.github.com/users/apache");

        let counters = parts[1].as_object().unwrap();
        for key in [
            "watchers",
            "stars",
            "forks",
            "full_name",
            "description",
            "homepage_url",
            "languages_url",
            "updated",
            "contributors",
            "total_commits",
            "open_pull_requests",
        ] {
            assert!(counters.contains_key(key), "missing counter {key}");
        }
        assert_eq!(counters["watchers"], 2000);
        assert_eq!(counters["stars"], 38000);
        assert_eq!(counters["updated"], "Tue, 01 Oct 2024 12:00:00 GMT");
    }
}
