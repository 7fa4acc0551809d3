use chrono::NaiveDateTime;
use interfaces_github_stats::{
    index::GitHubApi,
    models::{CommitActivityPayload, RepoId},
};
use serde::Serialize;

use super::{serialize_weeks, week_start, StatsError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct YearlyCommitActivity {
    #[serde(serialize_with = "serialize_weeks")]
    pub week: Vec<NaiveDateTime>,
    pub total_commits: Vec<u64>,
}

pub fn weekly_totals(stats: &[CommitActivityPayload]) -> Result<YearlyCommitActivity, StatsError> {
    let mut activity = YearlyCommitActivity::default();
    for stat in stats {
        activity.week.push(week_start(stat.week)?);
        activity.total_commits.push(stat.total);
    }
    Ok(activity)
}

/// Weekly commit totals of the trailing year, as JSON text.
pub async fn yearly_commit_activity(
    api: &GitHubApi,
    token: &str,
    full_name: &str,
) -> Result<String, StatsError> {
    let repo: RepoId = full_name.parse()?;
    let stats = api.fetch_stats_commit_activity(token, &repo).await?;
    let activity = weekly_totals(&stats)?;
    Ok(serde_json::to_string(&activity)?)
}
