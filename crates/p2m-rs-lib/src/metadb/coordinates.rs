use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::properties::get_property;

/// Maven style coordinates of a publishable artifact.
///
/// Only `group_id`, `artifact_id`, `version` and `classifier` take part in equality.
/// Any field may be unset while coordinates are being derived, unset fields render as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MavenCoordinates {
	pub group_id: Option<String>,
	pub artifact_id: Option<String>,
	pub version: Option<String>,
	pub classifier: Option<String>,
	#[serde(rename = "type")]
	pub kind: Option<String>,
	pub properties: HashMap<String, String>,
}

impl MavenCoordinates {
	pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>, version: impl Into<String>) -> Self {
		Self {
			group_id: Some(group_id.into()),
			artifact_id: Some(artifact_id.into()),
			version: Some(version.into()),
			..Default::default()
		}
	}

	/// Reads the coordinates a unit or artifact declares about itself.
	///
	/// `maven-wrapped-*` keys are used when the plain keys are missing or blank.
	/// Returns `None` unless both a group and an artifact are present.
	pub fn from_properties(properties: &HashMap<String, String>) -> Option<Self> {
		let group_id = get_property(properties, "maven-groupId", &["maven-wrapped-groupId"])?;
		let artifact_id = get_property(properties, "maven-artifactId", &["maven-wrapped-artifactId"])?;
		let version = get_property(properties, "maven-version", &["maven-wrapped-version"])
			.map(|v| v.strip_suffix("-SNAPSHOT").unwrap_or(v));

		Some(Self {
			group_id: Some(group_id.to_string()),
			artifact_id: Some(artifact_id.to_string()),
			version: version.map(str::to_string),
			classifier: get_property(properties, "maven-classifier", &["maven-wrapped-classifier"]).map(str::to_string),
			kind: get_property(properties, "maven-type", &["maven-wrapped-type"]).map(str::to_string),
			properties: Default::default(),
		})
	}

	pub fn group_id(&self) -> &str {
		self.group_id.as_deref().unwrap_or_default()
	}

	pub fn artifact_id(&self) -> &str {
		self.artifact_id.as_deref().unwrap_or_default()
	}

	pub fn version(&self) -> &str {
		self.version.as_deref().unwrap_or_default()
	}

	/// Path of the artifact directory inside a maven repository layout.
	pub fn repository_path(&self) -> String {
		format!("{}/{}/{}", self.group_id().replace('.', "/"), self.artifact_id(), self.version())
	}

	/// File name of the artifact with the given extension.
	pub fn file_name(&self, extension: &str) -> String {
		match &self.classifier {
			Some(classifier) => format!("{}-{}-{}.{}", self.artifact_id(), self.version(), classifier, extension),
			None => format!("{}-{}.{}", self.artifact_id(), self.version(), extension),
		}
	}
}

impl PartialEq for MavenCoordinates {
	fn eq(&self, other: &Self) -> bool {
		self.group_id == other.group_id
			&& self.artifact_id == other.artifact_id
			&& self.version == other.version
			&& self.classifier == other.classifier
	}
}

impl Eq for MavenCoordinates {}

impl std::hash::Hash for MavenCoordinates {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.group_id.hash(state);
		self.artifact_id.hash(state);
		self.version.hash(state);
		self.classifier.hash(state);
	}
}

impl std::fmt::Display for MavenCoordinates {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}:{}:{}", self.group_id(), self.artifact_id(), self.version())
	}
}
