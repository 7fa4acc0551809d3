use std::collections::HashSet;

use chrono::{Datelike, NaiveDateTime};
use interfaces_github_stats::{
    index::GitHubApi,
    models::{CodeFrequencyEntry, RepoId},
};
use serde::Serialize;

use super::{serialize_weeks, week_start, StatsError};

pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct YearlyCodeFrequency {
    #[serde(serialize_with = "serialize_weeks")]
    pub week: Vec<NaiveDateTime>,
    pub additions: Vec<i64>,
    pub deletions: Vec<i64>,
}

/// Walks the weeks newest first and keeps the first week seen in each
/// calendar month until twelve months are collected.
pub fn one_week_per_month(stats: &[CodeFrequencyEntry]) -> Result<YearlyCodeFrequency, StatsError> {
    let mut months = HashSet::with_capacity(MONTHS_PER_YEAR);
    let mut frequency = YearlyCodeFrequency::default();

    for &CodeFrequencyEntry(timestamp, additions, deletions) in stats.iter().rev() {
        if months.len() == MONTHS_PER_YEAR {
            break;
        }

        let week = week_start(timestamp)?;
        if months.insert((week.year(), week.month())) {
            frequency.week.push(week);
            frequency.additions.push(additions);
            frequency.deletions.push(deletions);
        }
    }

    if months.len() < MONTHS_PER_YEAR {
        return Err(StatsError::InsufficientData {
            wanted: MONTHS_PER_YEAR,
            found: months.len(),
        });
    }

    Ok(frequency)
}

/// Additions and deletions of the last twelve months, one week per month,
/// most recent first, as JSON text.
pub async fn yearly_code_frequency(
    api: &GitHubApi,
    token: &str,
    full_name: &str,
) -> Result<String, StatsError> {
    let repo: RepoId = full_name.parse()?;
    let stats = api.fetch_stats_code_frequency(token, &repo).await?;
    let frequency = one_week_per_month(&stats)?;
    Ok(serde_json::to_string(&frequency)?)
}
