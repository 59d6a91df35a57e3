//! Periodic maintenance jobs.
//!
//! - `maintenance` - Correlation pruning, directory reload and emoji refresh

pub mod maintenance;
