pub mod read_all;
pub mod read_by_repo;
