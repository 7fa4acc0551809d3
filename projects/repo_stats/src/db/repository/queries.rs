use diesel::prelude::*;

use crate::db::{repository::models::*, schema::repo::dsl::*};

#[derive(Debug, thiserror::Error)]
pub enum InsertRepositoryError {
    #[error("InsertRepository: {source}")]
    InsertRepository {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn insert_repository(
    conn: &mut PgConnection,
    new: &NewRepository,
) -> Result<Repository, InsertRepositoryError> {
    diesel::insert_into(repo)
        .values(new)
        .returning(Repository::as_returning())
        .get_result(conn)
        .map_err(|source| InsertRepositoryError::InsertRepository { source })
}

#[derive(Debug, thiserror::Error)]
pub enum GetAllRepositoriesError {
    #[error("GetAllRepositories: {source}")]
    GetAllRepositories {
        #[from]
        source: diesel::result::Error,
    },
}

pub fn get_all_repositories(conn: &mut PgConnection) -> Result<Vec<Repository>, GetAllRepositoriesError> {
    repo.order(id.asc())
        .select(Repository::as_select())
        .load(conn)
        .map_err(|source| GetAllRepositoriesError::GetAllRepositories { source })
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAllRepositoriesError {
    #[error("DeleteAllRepositories: {source}")]
    DeleteAllRepositories {
        #[from]
        source: diesel::result::Error,
    },
}

/// Removes every repository; their pull requests go with them through the
/// cascading foreign key.
pub fn delete_all_repositories(conn: &mut PgConnection) -> Result<usize, DeleteAllRepositoriesError> {
    diesel::delete(repo)
        .execute(conn)
        .map_err(|source| DeleteAllRepositoriesError::DeleteAllRepositories { source })
}
