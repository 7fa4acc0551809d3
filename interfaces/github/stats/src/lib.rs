//! GitHub REST/GraphQL client for repository statistics
//!
//! - `index` holds the HTTP client and the REST fetches
//! - `graphql` batches user profile lookups
//! - `models` mirrors the upstream JSON payloads

pub mod graphql;
pub mod index;
pub mod models;
