use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::*;

/// Classifier of feature artifacts, these live in the `features` folder of a site.
pub const FEATURE_CLASSIFIER: &str = "org.eclipse.update.feature";
pub const BUNDLE_CLASSIFIER: &str = "osgi.bundle";

/// Reference from a unit to an artifact it installs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactKey {
	#[serde(default)]
	pub classifier: String,
	pub id: String,
	pub version: String,
}

/// A binary published by a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artifact {
	pub id: String,
	pub version: String,
	pub classifier: String,
	pub properties: HashMap<String, String>,
	/// Coordinates the artifact declares for itself.
	pub maven: Option<MavenCoordinates>,
	/// Where the binary can be downloaded from.
	pub url: String,
	/// Download location relative to the download directory.
	pub file: String,
	pub size: Option<u64>,
	pub sha1: Option<String>,
	pub sha256: Option<String>,
	pub sha512: Option<String>,
	/// Name of the site the artifact was read from.
	pub site: String,
}

impl Artifact {
	/// Folder of the site holding artifacts with `classifier`.
	pub fn folder_for_classifier(classifier: &str) -> &'static str {
		if classifier == FEATURE_CLASSIFIER { "features" } else { "plugins" }
	}

	/// Fills in `url` and `file` from the site and the artifact identity.
	pub fn set_location(&mut self, site_name: &str, site_url: &str) {
		let file = format!("{}_{}.jar", self.id, self.version);
		let folder = Self::folder_for_classifier(&self.classifier);
		self.url = format!("{}/{}/{}", site_url.trim_end_matches('/'), folder, file);
		self.file = format!("{}/{}/{}", site_name, folder, file);
	}
}

impl PartialEq for Artifact {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.version == other.version && self.classifier == other.classifier
	}
}

impl Eq for Artifact {}

impl std::hash::Hash for Artifact {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.id.hash(state);
		self.version.hash(state);
		self.classifier.hash(state);
	}
}

impl std::fmt::Display for Artifact {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{}", self.id, self.version)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn artifact_location_uses_plugins_folder() {
		let mut a = Artifact { id: "org.slf4j.api".to_string(), version: "1.7.36".to_string(), classifier: BUNDLE_CLASSIFIER.to_string(), ..Default::default() };
		a.set_location("orbit", "https://download.eclipse.org/orbit/");
		assert_eq!(a.url, "https://download.eclipse.org/orbit/plugins/org.slf4j.api_1.7.36.jar");
		assert_eq!(a.file, "orbit/plugins/org.slf4j.api_1.7.36.jar");
	}

	#[test]
	fn artifact_location_uses_features_folder() {
		let mut a = Artifact { id: "org.eclipse.birt".to_string(), version: "4.16.0".to_string(), classifier: FEATURE_CLASSIFIER.to_string(), ..Default::default() };
		a.set_location("birt", "https://download.eclipse.org/birt");
		assert_eq!(a.url, "https://download.eclipse.org/birt/features/org.eclipse.birt_4.16.0.jar");
	}
}
