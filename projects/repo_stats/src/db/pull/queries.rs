use diesel::prelude::*;
use thiserror::Error;

use crate::db::{
    pull::models::*,
    repository::models::Repository,
    schema::{pull, repo},
};

#[derive(Debug, Error)]
pub enum InsertPullRequestsError {
    #[error("InsertPullRequests: {source}")]
    InsertPullRequests {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn insert_pull_requests(
    conn: &mut PgConnection,
    new: &[NewPullRequest],
) -> Result<usize, InsertPullRequestsError> {
    if new.is_empty() {
        return Ok(0);
    }

    diesel::insert_into(pull::table)
        .values(new)
        .execute(conn)
        .map_err(|source| InsertPullRequestsError::InsertPullRequests { source })
}

#[derive(Debug, Error)]
pub enum GetAllPullRequestsError {
    #[error("GetAllPullRequests: {source}")]
    GetAllPullRequests {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_all_pull_requests(
    conn: &mut PgConnection,
) -> Result<Vec<(PullRequest, Repository)>, GetAllPullRequestsError> {
    pull::table
        .inner_join(repo::table)
        .order(pull::id.asc())
        .select((PullRequest::as_select(), Repository::as_select()))
        .load(conn)
        .map_err(|source| GetAllPullRequestsError::GetAllPullRequests { source })
}

#[derive(Debug, Error)]
pub enum GetPullRequestsByRepositoryNameError {
    #[error("GetPullRequestsByRepositoryName: {source}")]
    GetPullRequestsByRepositoryName {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_pull_requests_by_repository_name(
    conn: &mut PgConnection,
    name_val: &str,
) -> Result<Vec<(PullRequest, Repository)>, GetPullRequestsByRepositoryNameError> {
    pull::table
        .inner_join(repo::table)
        .filter(repo::name.eq(name_val))
        .order(pull::id.asc())
        .select((PullRequest::as_select(), Repository::as_select()))
        .load(conn)
        .map_err(|source| GetPullRequestsByRepositoryNameError::GetPullRequestsByRepositoryName { source })
}
