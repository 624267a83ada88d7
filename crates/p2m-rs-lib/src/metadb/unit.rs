use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::*;

/// An installable unit read from a site catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallableUnit {
	pub id: String,
	pub version: String,
	pub name: Option<String>,
	pub description: Option<String>,
	pub properties: HashMap<String, String>,
	pub provides: Vec<ProvidedCapability>,
	pub requires: Vec<RequiredCapability>,
	/// Keys of the artifacts the unit installs.
	pub artifacts: Vec<ArtifactKey>,
	/// Coordinates the unit declares for itself.
	pub maven: Option<MavenCoordinates>,
	/// Name of the site the unit was read from.
	pub site: String,
}

impl InstallableUnit {
	/// Checks whether any provided capability satisfies `required`.
	pub fn does_fulfill_requirement(&self, required: &RequiredCapability) -> bool {
		self.provides.iter().any(|p| does_capability_fulfill_requirement(p, required))
	}
}

impl PartialEq for InstallableUnit {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.version == other.version
	}
}

impl Eq for InstallableUnit {}

impl std::hash::Hash for InstallableUnit {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.id.hash(state);
		self.version.hash(state);
	}
}

impl std::fmt::Display for InstallableUnit {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{}", self.id, self.version)
	}
}
