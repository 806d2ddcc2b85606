// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod bracket;
pub mod config;
pub mod import;
pub mod league;
pub mod report;
pub mod stats;
pub mod store;
