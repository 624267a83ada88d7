//! Downloads artifact binaries from their sites.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use sha2::Digest;
use thiserror::Error;

use crate::metadb::Artifact;

/// Errors that can occur while downloading an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
	/// The artifact was never given a location on its site.
	#[error("artifact {0} has no download location.")]
	MissingLocation(String),
	/// The downloaded content hash does not match the hash published by the site.
	#[error("checksum of {file} does not match, expected {expected} got {actual}")]
	DifferentHashes { file: String, expected: String, actual: String },
	#[error("reqwest error: {0}")]
	Reqwest(#[from] reqwest::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

pub fn get_artifact_download_path(download_dir: &Path, artifact: &Artifact) -> PathBuf {
	download_dir.join(&artifact.file)
}

/// Checks `content` against the strongest checksum the artifact carries.
///
/// sha-512 is preferred over sha-256. Artifacts with neither pass unchecked.
pub fn verify_checksum(artifact: &Artifact, content: &[u8]) -> Result<(), DownloadError> {
	let (expected, actual) = if let Some(expected) = &artifact.sha512 {
		(expected, format!("{:x}", sha2::Sha512::digest(content)))
	} else if let Some(expected) = &artifact.sha256 {
		(expected, sha256::digest(content))
	} else {
		log::debug!("No checksum for {}, skipping verification", artifact);
		return Ok(());
	};

	if expected.eq_ignore_ascii_case(&actual) {
		Ok(())
	} else {
		Err(DownloadError::DifferentHashes { file: artifact.file.clone(), expected: expected.clone(), actual })
	}
}

/// Downloads one artifact into `download_dir` unless it is already there.
///
/// Files already on disk are verified again. New content is verified before it lands,
/// and is written through a `.part` file which is renamed once complete.
pub async fn download_artifact(client: &reqwest::Client, download_dir: &Path, artifact: &Artifact) -> Result<PathBuf, DownloadError> {
	if artifact.url.is_empty() || artifact.file.is_empty() {
		return Err(DownloadError::MissingLocation(artifact.to_string()));
	}

	let download_path = get_artifact_download_path(download_dir, artifact);
	if download_path.exists() {
		log::info!("Artifact {} already downloaded, skipping.", artifact);
		let content = tokio::fs::read(&download_path).await?;
		verify_checksum(artifact, &content)?;
		return Ok(download_path);
	}

	log::info!("Downloading artifact {} from {}", artifact, artifact.url);
	let content = client
		.get(&artifact.url)
		.send()
		.await?
		.error_for_status()?
		.bytes()
		.await?;

	verify_checksum(artifact, &content)?;

	if let Some(parent) = download_path.parent() {
		tokio::fs::create_dir_all(parent).await?;
	}
	let part_path = part_path(&download_path);
	let written = match tokio::fs::write(&part_path, &content).await {
		Ok(()) => tokio::fs::rename(&part_path, &download_path).await,
		Err(e) => Err(e),
	};
	if let Err(e) = written {
		if let Err(remove) = tokio::fs::remove_file(&part_path).await {
			log::debug!("Failed to remove {}: {}", part_path.display(), remove);
		}
		return Err(e.into());
	}

	Ok(download_path)
}

fn part_path(download_path: &Path) -> PathBuf {
	let mut name = download_path.as_os_str().to_owned();
	name.push(".part");
	PathBuf::from(name)
}

/// Downloads multiple artifacts in parallel, bounded by the configured concurrency.
///
/// # Returns
/// The local path of each artifact keyed by [`Artifact::file`].
pub async fn download_artifacts(config: &crate::Config, artifacts: Vec<Artifact>) -> crate::Result<HashMap<String, PathBuf>> {
	let client = reqwest::Client::builder()
		.https_only(config.https_only())
		.build()?;
	let download_dir = config.download_dir().to_path_buf();

	let downloaded = crate::tasks::process_in_parallel(artifacts, config.concurrency(), move |artifact| {
		let client = client.clone();
		let download_dir = download_dir.clone();
		async move {
			let path = download_artifact(&client, &download_dir, &artifact).await?;
			Ok((artifact.file, path))
		}
	}).await?;

	Ok(downloaded.into_iter().collect())
}
