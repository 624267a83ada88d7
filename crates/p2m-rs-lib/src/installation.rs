//! Fetching artifacts and handing resolved units over for publishing.

pub mod download;
pub mod deployment;
