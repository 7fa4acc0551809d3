//! GitHub repository activity statistics service
//!
//! - Upstream aggregations in `stats/`
//! - REST API endpoints in `endpoints/`, wired up in `router`
//! - PostgreSQL models and queries in `db/`
//! - Bulk pull request refresh in `refresh`
//! - Environment configuration in `config`

pub mod config;
pub mod context;
pub mod db;
pub mod endpoints;
pub mod refresh;
pub mod router;
pub mod stats;
