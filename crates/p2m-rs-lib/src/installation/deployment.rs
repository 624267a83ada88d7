//! Hands resolved units to whatever publishes them.

use std::path::PathBuf;

use crate::relationship_resolver::PublishRequest;

/// Local copies of the binaries belonging to a [`PublishRequest`].
#[derive(Debug, Clone, Default)]
pub struct DeployFiles {
	pub jar: Option<PathBuf>,
	pub sources: Option<PathBuf>,
}

/// Publishes a single unit.
///
/// Called from a blocking thread, implementations may block on IO.
/// Requests for pom-only units never carry a jar.
pub trait Deployer: Send + Sync {
	fn deploy(&self, request: &PublishRequest, files: &DeployFiles) -> crate::Result<()>;
}

/// Logs each request instead of publishing it.
#[derive(Debug, Default)]
pub struct DryRunDeployer;

impl Deployer for DryRunDeployer {
	fn deploy(&self, request: &PublishRequest, files: &DeployFiles) -> crate::Result<()> {
		let coordinates = match request.coordinates() {
			Some(c) => c,
			None => return Err(crate::Error::Validation(format!("{} has no coordinates", request.unit.id))),
		};

		if request.is_pom_only() {
			log::info!("Would deploy pom {}", coordinates);
		} else {
			log::info!("Would deploy {} jar={:?} sources={:?}", coordinates, files.jar, files.sources);
		}
		for dependency in &request.dependencies {
			log::debug!("  depends on {}", dependency);
		}
		for dependency in &request.optional_dependencies {
			log::debug!("  optionally depends on {}", dependency);
		}
		Ok(())
	}
}
