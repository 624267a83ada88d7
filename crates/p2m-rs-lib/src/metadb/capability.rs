use serde::{Deserialize, Serialize};

/// A capability a unit offers to others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvidedCapability {
	pub namespace: String,
	pub name: String,
	#[serde(default)]
	pub version: String,
}

impl ProvidedCapability {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
		Self { namespace: namespace.into(), name: name.into(), version: version.into() }
	}
}

impl std::fmt::Display for ProvidedCapability {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{},{}", self.namespace, self.name, self.version)
	}
}

/// A capability a unit needs from some other unit.
///
/// `range` is kept for reference only, requirements are never matched on versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequiredCapability {
	pub namespace: String,
	pub name: String,
	#[serde(default)]
	pub range: String,
	#[serde(default)]
	pub optional: bool,
}

impl RequiredCapability {
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
			range: String::new(),
			optional: false,
		}
	}

	pub fn optional(mut self) -> Self {
		self.optional = true;
		self
	}
}

impl PartialEq for RequiredCapability {
	fn eq(&self, other: &Self) -> bool {
		self.namespace == other.namespace && self.name == other.name && self.range == other.range
	}
}

impl Eq for RequiredCapability {}

impl std::hash::Hash for RequiredCapability {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.namespace.hash(state);
		self.name.hash(state);
		self.range.hash(state);
	}
}

impl std::fmt::Display for RequiredCapability {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{},{}", self.namespace, self.name, self.range)
	}
}

/// Checks if `provided` satisfies `required`.
///
/// Only the namespace and name are compared. p2 version ranges have no lossless equivalent in a
/// single maven version so they are ignored.
pub fn does_capability_fulfill_requirement(provided: &ProvidedCapability, required: &RequiredCapability) -> bool {
	provided.namespace == required.namespace && provided.name == required.name
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capability_matches_name_and_namespace() {
		let provided = ProvidedCapability::new("osgi.bundle", "org.slf4j.api", "1.7.36");
		let mut required = RequiredCapability::new("osgi.bundle", "org.slf4j.api");
		required.range = "[2.0.0,3.0.0)".to_string();
		assert!(does_capability_fulfill_requirement(&provided, &required));
	}

	#[test]
	fn capability_namespace_must_match() {
		let provided = ProvidedCapability::new("java.package", "org.slf4j", "1.7.36");
		let required = RequiredCapability::new("osgi.bundle", "org.slf4j");
		assert!(!does_capability_fulfill_requirement(&provided, &required));
	}

	#[test]
	fn capability_name_must_match() {
		let provided = ProvidedCapability::new("osgi.bundle", "org.slf4j.api", "1.7.36");
		let required = RequiredCapability::new("osgi.bundle", "org.slf4j");
		assert!(!does_capability_fulfill_requirement(&provided, &required));
	}
}
