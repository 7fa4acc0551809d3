pub mod pull;
pub mod refresh;
pub mod repo;
pub mod stats;
