use std::collections::HashMap;

use interfaces_github_stats::{
    graphql::UserProfile,
    index::GitHubApi,
    models::{ContributorStatsPayload, RepoId},
};
use serde::Serialize;
use tracing::debug;

use super::StatsError;

/// Leading entries of the contributor statistics that are dropped.
///
/// The statistics endpoint lists at most 100 contributors in ascending order
/// of total commits, so what remains after the skip is the top ten.
pub const SKIPPED_CONTRIBUTOR_ENTRIES: usize = 90;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TopContributors {
    pub user: Vec<String>,
    pub name: Vec<Option<String>>,
    pub followers: Vec<u64>,
    pub total_commits: Vec<u64>,
}

/// `(login, total commits)` of every contributor past the skipped window.
/// Entries without an author (deleted accounts) are dropped.
pub fn remaining_contributors(stats: &[ContributorStatsPayload]) -> Vec<(String, u64)> {
    stats
        .iter()
        .skip(SKIPPED_CONTRIBUTOR_ENTRIES)
        .filter_map(|stat| stat.author.as_ref().map(|author| (author.login.clone(), stat.total)))
        .collect()
}

pub fn align_with_profiles(
    contributors: Vec<(String, u64)>,
    profiles: &HashMap<String, UserProfile>,
) -> TopContributors {
    let mut top = TopContributors::default();
    for (login, total) in contributors {
        let profile = profiles.get(&login);
        top.name.push(profile.and_then(|profile| profile.name.clone()));
        top.followers.push(profile.map_or(0, |profile| profile.followers));
        top.total_commits.push(total);
        top.user.push(login);
    }
    top
}

/// Profiles come from batched GraphQL lookups. Logins GraphQL does not
/// resolve are looked up one by one over REST.
pub async fn top_contributors(
    api: &GitHubApi,
    token: &str,
    full_name: &str,
) -> Result<TopContributors, StatsError> {
    let repo: RepoId = full_name.parse()?;
    let stats = api.fetch_stats_contributors(token, &repo).await?;
    let contributors = remaining_contributors(&stats);

    let logins: Vec<String> = contributors.iter().map(|(login, _)| login.clone()).collect();
    let mut profiles = api.fetch_user_profiles(token, &logins).await?;

    let unresolved: Vec<&String> = logins
        .iter()
        .filter(|login| !profiles.contains_key(*login))
        .collect();
    if !unresolved.is_empty() {
        debug!(count = unresolved.len(), repo = %repo, "falling back to REST user lookups");
    }
    for login in unresolved {
        let user = api.fetch_user(token, login).await?;
        profiles.insert(
            login.clone(),
            UserProfile {
                login: user.login,
                name: user.name,
                followers: user.followers,
            },
        );
    }

    Ok(align_with_profiles(contributors, &profiles))
}
