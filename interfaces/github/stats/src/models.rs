use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRepoIdError {
    #[error("expected `owner/name`, got `{input}`")]
    Malformed { input: String },
}

impl FromStr for RepoId {
    type Err = ParseRepoIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseRepoIdError::Malformed {
            input: input.to_string(),
        };

        let (owner, name) = input.trim().split_once('/').ok_or_else(malformed)?;
        if !is_path_segment(owner) || !is_path_segment(name) {
            return Err(malformed());
        }

        Ok(RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

/// Owner and repository names are limited to ASCII alphanumerics, `.`, `_`
/// and `-`, so they can be spliced into URL paths as-is.
fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwnerPayload {
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

/// `GET /repos/{owner}/{name}`
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub languages_url: String,
    pub subscribers_count: u64,
    pub watchers_count: u64,
    pub forks_count: u64,
    pub owner: OwnerPayload,
}

/// `GET /users/{login}`
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
    pub name: Option<String>,
    #[serde(default)]
    pub followers: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorPayload {
    pub login: String,
}

/// One element of `GET /repos/{owner}/{name}/stats/contributors`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContributorStatsPayload {
    pub author: Option<AuthorPayload>,
    pub total: u64,
}

/// One week of `GET /repos/{owner}/{name}/stats/commit_activity`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommitActivityPayload {
    #[serde(default)]
    pub days: Vec<u64>,
    pub total: u64,
    pub week: i64,
}

/// `[week, additions, deletions]`; deletions come back negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CodeFrequencyEntry(pub i64, pub i64, pub i64);

/// `[day, hour, commits]` with day 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PunchCardEntry(pub u8, pub u8, pub u64);

/// Element of `GET /repos/{owner}/{name}/pulls`.
#[derive(Debug, Clone, Deserialize)]
pub struct PullSummaryPayload {
    pub number: u64,
    pub created_at: DateTime<Utc>,
}

/// `GET /repos/{owner}/{name}/pulls/{number}`
#[derive(Debug, Clone, Deserialize)]
pub struct PullDetailPayload {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub merged: bool,
    pub additions: u64,
    pub deletions: u64,
}
