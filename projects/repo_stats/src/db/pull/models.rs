use chrono::NaiveDate;
use diesel::prelude::*;
use serde::Serialize;

use crate::db::repository::models::Repository;
use crate::db::schema::pull;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Associations)]
#[diesel(belongs_to(Repository, foreign_key = repo_id))]
#[diesel(table_name = pull)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PullRequest {
    pub id: i32,
    pub repo_id: i32,
    pub created_date: NaiveDate,
    pub is_merged: bool,
    pub additions: i32,
    pub deletions: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pull)]
pub struct NewPullRequest {
    pub repo_id: i32,
    pub created_date: NaiveDate,
    pub is_merged: bool,
    pub additions: i32,
    pub deletions: i32,
}

/// Wire shape of a pull request: the foreign key is expanded to the owning
/// repository and the date is rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestView {
    pub id: i32,
    pub repo_id: Repository,
    #[serde(serialize_with = "serialize_date")]
    pub created_date: NaiveDate,
    pub is_merged: bool,
    pub additions: i32,
    pub deletions: i32,
}

impl From<(PullRequest, Repository)> for PullRequestView {
    fn from((pull, repository): (PullRequest, Repository)) -> Self {
        Self {
            id: pull.id,
            repo_id: repository,
            created_date: pull.created_date,
            is_merged: pull.is_merged,
            additions: pull.additions,
            deletions: pull.deletions,
        }
    }
}

fn serialize_date<S: serde::Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
}
