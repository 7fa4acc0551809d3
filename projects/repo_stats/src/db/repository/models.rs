use diesel::prelude::*;
use serde::Serialize;

use crate::db::schema::repo;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = repo)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Repository {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = repo)]
pub struct NewRepository<'a> {
    pub name: &'a str,
}
