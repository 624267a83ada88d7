//! Library error type.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("regex error: {0}")]
	Regex(#[from] regex::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),
	/// A unit explicitly requested for publishing is not in any site.
	#[error("no such unit found: {0}")]
	NoSuchUnit(String),
	#[error("downloader failed: {0}")]
	Download(#[from] crate::installation::download::DownloadError),
	/// A parallel task panicked or was cancelled.
	#[error("task failed: {0}")]
	Task(String),
}

impl From<tokio::task::JoinError> for Error {
	fn from(value: tokio::task::JoinError) -> Self {
		Error::Task(value.to_string())
	}
}
