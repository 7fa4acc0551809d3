use chrono::NaiveDate;
use diesel::prelude::*;
use thiserror::Error;

use crate::db::{
    pull::{
        models::NewPullRequest,
        queries::{insert_pull_requests, InsertPullRequestsError},
    },
    repository::{
        models::NewRepository,
        queries::{delete_all_repositories, insert_repository, DeleteAllRepositoriesError, InsertRepositoryError},
    },
};

/// Pull request row without its owning repository id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRecord {
    pub created_date: NaiveDate,
    pub is_merged: bool,
    pub additions: i32,
    pub deletions: i32,
}

/// A repository and the pull requests stored under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySnapshot {
    pub name: String,
    pub pulls: Vec<PullRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaceSummary {
    pub repositories: usize,
    pub pull_requests: usize,
}

#[derive(Debug, Error)]
pub enum ReplaceSnapshotError {
    #[error(transparent)]
    DeleteAllRepositories {
        #[from]
        source: DeleteAllRepositoriesError,
    },
    #[error(transparent)]
    InsertRepository {
        #[from]
        source: InsertRepositoryError,
    },
    #[error(transparent)]
    InsertPullRequests {
        #[from]
        source: InsertPullRequestsError,
    },
    #[error("Transaction: {source}")]
    Transaction {
        #[from]
        source: diesel::result::Error,
    },
}

/// Clears both tables and stores `snapshots` in one transaction, so readers
/// see either the previous contents or the complete new set.
pub fn replace_snapshot(
    conn: &mut PgConnection,
    snapshots: &[RepositorySnapshot],
) -> Result<ReplaceSummary, ReplaceSnapshotError> {
    conn.transaction::<_, ReplaceSnapshotError, _>(|conn| {
        delete_all_repositories(conn)?;

        let mut summary = ReplaceSummary::default();
        for snapshot in snapshots {
            let repository = insert_repository(conn, &NewRepository { name: &snapshot.name })?;
            summary.repositories += 1;

            let rows: Vec<NewPullRequest> = snapshot
                .pulls
                .iter()
                .map(|record| NewPullRequest {
                    repo_id: repository.id,
                    created_date: record.created_date,
                    is_merged: record.is_merged,
                    additions: record.additions,
                    deletions: record.deletions,
                })
                .collect();
            summary.pull_requests += insert_pull_requests(conn, &rows)?;
        }

        Ok(summary)
    })
}
