use std::collections::BTreeMap;

use interfaces_github_stats::{
    index::GitHubApi,
    models::{PunchCardEntry, RepoId},
};
use serde::Serialize;

use super::StatsError;

/// Weekday names indexed the way the punch card numbers days.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCommits {
    pub day: Vec<&'static str>,
    pub commits: Vec<u64>,
}

/// Sums the hourly punch card counts per weekday, Sunday first. Weekdays
/// absent from the input are absent from the result.
pub fn sum_commits_per_day(entries: &[PunchCardEntry]) -> Result<DailyCommits, StatsError> {
    let mut totals: BTreeMap<u8, u64> = BTreeMap::new();

    for &PunchCardEntry(day, _hour, commits) in entries {
        if usize::from(day) >= DAY_NAMES.len() {
            return Err(StatsError::InvalidDayIndex { day });
        }
        *totals.entry(day).or_insert(0) += commits;
    }

    let (day, commits) = totals
        .into_iter()
        .map(|(day, commits)| (DAY_NAMES[usize::from(day)], commits))
        .unzip();

    Ok(DailyCommits { day, commits })
}

pub async fn daily_commits(
    api: &GitHubApi,
    token: &str,
    full_name: &str,
) -> Result<DailyCommits, StatsError> {
    let repo: RepoId = full_name.parse()?;
    let punch_card = api.fetch_stats_punch_card(token, &repo).await?;
    sum_commits_per_day(&punch_card)
}
