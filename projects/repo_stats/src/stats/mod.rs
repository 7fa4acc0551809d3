//! Reshaping of upstream repository statistics into flat, index-aligned
//! sequences. Every function parses an `owner/name` identifier, queries the
//! upstream API with the caller's credential and keeps no state between calls.

pub mod daily_commits;
pub mod repository_summary;
pub mod top_contributors;
pub mod yearly_code_frequency;
pub mod yearly_commit_activity;

use chrono::{DateTime, NaiveDateTime};
use interfaces_github_stats::{index::FetchGitHubError, models::ParseRepoIdError};
use serde::Serializer;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("InvalidIdentifier: {source}")]
    InvalidIdentifier {
        #[from]
        source: ParseRepoIdError,
    },

    #[error("FetchGitHub: {source}")]
    FetchGitHub {
        #[from]
        source: FetchGitHubError,
    },

    #[error("InsufficientData: wanted {wanted} distinct months, found {found}")]
    InsufficientData { wanted: usize, found: usize },

    #[error("InvalidTimestamp: {value}")]
    InvalidTimestamp { value: i64 },

    #[error("InvalidDayIndex: {day}")]
    InvalidDayIndex { day: u8 },

    #[error("SerializeResult: {source}")]
    SerializeResult {
        #[from]
        source: serde_json::Error,
    },
}

/// Start of an upstream statistics week, given as unix seconds.
pub(crate) fn week_start(timestamp: i64) -> Result<NaiveDateTime, StatsError> {
    DateTime::from_timestamp(timestamp, 0)
        .map(|moment| moment.naive_utc())
        .ok_or(StatsError::InvalidTimestamp { value: timestamp })
}

/// Weeks go over the wire as their display string, `YYYY-MM-DD HH:MM:SS`.
pub(crate) fn serialize_weeks<S: Serializer>(
    weeks: &[NaiveDateTime],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(weeks.iter().map(ToString::to_string))
}
