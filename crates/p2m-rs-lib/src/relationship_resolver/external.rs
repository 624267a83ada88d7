//! Checks whether derived coordinates are already available from a public repository.

use crate::metadb::MavenCoordinates;

use super::Policy;

/// Answers whether an artifact already exists in a remote repository.
pub trait CoordinateResolver {
	/// # Errors
	/// Any failure to get a definite answer, callers decide how to treat it.
	fn exists(&self, coordinates: &MavenCoordinates) -> crate::Result<bool>;
}

/// Looks artifacts up in a maven repository with blocking `HEAD` requests.
///
/// This must not be used from inside an async context, run the resolve on a blocking thread instead.
#[derive(Debug, Clone)]
pub struct MavenRepositoryResolver {
	client: reqwest::blocking::Client,
	repository: String,
}

impl MavenRepositoryResolver {
	pub fn new(repository: impl Into<String>, https_only: bool) -> crate::Result<Self> {
		let client = reqwest::blocking::Client::builder()
			.https_only(https_only)
			.build()?;
		Ok(Self { client, repository: repository.into() })
	}

	pub fn from_config(config: &crate::Config) -> crate::Result<Self> {
		Self::new(config.repository(), config.https_only())
	}

	pub fn artifact_url(&self, coordinates: &MavenCoordinates) -> String {
		format!(
			"{}/{}/{}",
			self.repository.trim_end_matches('/'),
			coordinates.repository_path(),
			coordinates.file_name(coordinates.kind.as_deref().unwrap_or("jar")),
		)
	}
}

impl CoordinateResolver for MavenRepositoryResolver {
	fn exists(&self, coordinates: &MavenCoordinates) -> crate::Result<bool> {
		let url = self.artifact_url(coordinates);
		log::debug!("Resolving {} at {}", coordinates, url);
		let response = self.client.head(&url).send()?;
		if response.status() == reqwest::StatusCode::NOT_FOUND {
			log::debug!("Missing {}", coordinates);
			return Ok(false);
		}
		response.error_for_status()?;
		log::debug!("Resolved {}", coordinates);
		Ok(true)
	}
}

/// Decides if a unit is used from a public repository instead of being published.
pub struct ExternalCheck<'a> {
	policy: &'a Policy,
	resolver: &'a dyn CoordinateResolver,
	resolve: bool,
}

impl<'a> ExternalCheck<'a> {
	/// # Parameters
	/// - `resolve` - When `false` no lookups are made and every unit with coordinates counts as external.
	pub fn new(policy: &'a Policy, resolver: &'a dyn CoordinateResolver, resolve: bool) -> Self {
		Self { policy, resolver, resolve }
	}

	/// Units without coordinates or matching a candidate rule are never external.
	/// A failed lookup counts as not external so the unit gets published.
	pub fn is_external(&self, id: &str, maven: Option<&MavenCoordinates>) -> bool {
		let Some(maven) = maven else { return false };
		if self.policy.is_candidate(id, Some(maven)) {
			return false;
		}
		if !self.resolve {
			return true;
		}
		match self.resolver.exists(maven) {
			Ok(exists) => exists,
			Err(e) => {
				log::warn!("Failed to look up {} for {}, it will be published: {}", maven, id, e);
				false
			},
		}
	}
}
