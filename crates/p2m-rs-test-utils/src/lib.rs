//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use p2m_rs::config::{MappingRule, SiteConfig};
use p2m_rs::metadb::*;
use p2m_rs::relationship_resolver::CoordinateResolver;

pub const TEST_SITE_NAME: &str = "test";
pub const TEST_SITE_URL: &str = "https://updates.example.com/release";
pub const DEFAULT_VERSION: &str = "1.0.0";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
}

/// Builds a [`SiteCatalog`] of bundles.
///
/// Every unit provides the `osgi.bundle` capability named after itself and has an artifact of the same id.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
	catalog: SiteCatalog,
}

impl CatalogBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a bundle with the default version and the given bundle requirements.
	pub fn unit(self, id: &str, requires: &[&str]) -> Self {
		self.unit_with_version(id, DEFAULT_VERSION, requires)
	}

	pub fn unit_with_version(mut self, id: &str, version: &str, requires: &[&str]) -> Self {
		self.catalog.units.push(site::UnitRecord {
			id: id.to_string(),
			version: version.to_string(),
			provides: vec![ProvidedCapability::new(BUNDLE_CLASSIFIER, id, version)],
			requires: requires.iter().map(|r| RequiredCapability::new(BUNDLE_CLASSIFIER, *r)).collect(),
			artifacts: vec![ArtifactKey { classifier: BUNDLE_CLASSIFIER.to_string(), id: id.to_string(), version: version.to_string() }],
			..Default::default()
		});
		self.catalog.artifacts.push(site::ArtifactRecord {
			id: id.to_string(),
			version: version.to_string(),
			classifier: BUNDLE_CLASSIFIER.to_string(),
			..Default::default()
		});
		self
	}

	/// Adds a unit without an artifact, as p2 generates for feature groups.
	pub fn group(mut self, id: &str, requires: &[&str]) -> Self {
		self.catalog.units.push(site::UnitRecord {
			id: id.to_string(),
			version: DEFAULT_VERSION.to_string(),
			provides: vec![ProvidedCapability::new("org.eclipse.equinox.p2.iu", id, DEFAULT_VERSION)],
			requires: requires.iter().map(|r| RequiredCapability::new(BUNDLE_CLASSIFIER, *r)).collect(),
			..Default::default()
		});
		self
	}

	/// Adds an optional bundle requirement to an existing unit.
	pub fn optional(mut self, id: &str, name: &str) -> Self {
		if let Some(unit) = self.catalog.units.iter_mut().find(|u| u.id == id) {
			unit.requires.push(RequiredCapability::new(BUNDLE_CLASSIFIER, name).optional());
		}
		self
	}

	/// Adds a requirement in another namespace to an existing unit.
	pub fn requirement(mut self, id: &str, requirement: RequiredCapability) -> Self {
		if let Some(unit) = self.catalog.units.iter_mut().find(|u| u.id == id) {
			unit.requires.push(requirement);
		}
		self
	}

	pub fn property(mut self, id: &str, key: &str, value: &str) -> Self {
		if let Some(unit) = self.catalog.units.iter_mut().find(|u| u.id == id) {
			unit.properties.insert(key.to_string(), value.to_string());
		}
		self
	}

	pub fn artifact_property(mut self, id: &str, key: &str, value: &str) -> Self {
		if let Some(artifact) = self.catalog.artifacts.iter_mut().find(|a| a.id == id) {
			artifact.properties.insert(key.to_string(), value.to_string());
		}
		self
	}

	/// Sets the `maven-*` hint properties of the artifact of `id`.
	pub fn hint(self, id: &str, group: &str, artifact: &str, version: &str) -> Self {
		self.artifact_property(id, "maven-groupId", group)
			.artifact_property(id, "maven-artifactId", artifact)
			.artifact_property(id, "maven-version", version)
	}

	pub fn build(self) -> SiteCatalog {
		self.catalog
	}

	/// A [`MetaDB`] holding the catalog as its only site.
	pub fn metadb(self) -> p2m_rs::MetaDB {
		p2m_rs::MetaDB::new(vec![Site::from_catalog(TEST_SITE_NAME, TEST_SITE_URL, self.catalog)])
	}
}

/// Maps `{prefix}.{rest}` ids to the group `prefix` and artifact `{prefix}.{rest}`.
pub fn prefix_mapping(prefix: &str) -> MappingRule {
	MappingRule {
		pattern: format!(r"({}\..+)", regex::escape(prefix)),
		group_id: Some(prefix.to_string()),
		artifact_id: Some("$1".to_string()),
		version: None,
	}
}

/// Writes `catalog` to `dir/{name}.json` and returns a site config reading it.
pub fn write_catalog(dir: &Path, name: &str, catalog: &SiteCatalog) -> Result<SiteConfig, Error> {
	let path: PathBuf = dir.join(format!("{}.json", name));
	std::fs::write(&path, serde_json::to_string_pretty(catalog)?)?;
	Ok(SiteConfig { name: name.to_string(), url: TEST_SITE_URL.to_string(), catalog: path })
}

/// Answers lookups from a fixed set of `group:artifact:version` strings.
#[derive(Debug, Default)]
pub struct StaticResolver {
	known: HashSet<String>,
}

impl StaticResolver {
	pub fn new(known: &[&str]) -> Self {
		Self { known: known.iter().map(|k| k.to_string()).collect() }
	}
}

impl CoordinateResolver for StaticResolver {
	fn exists(&self, coordinates: &MavenCoordinates) -> p2m_rs::Result<bool> {
		Ok(self.known.contains(&coordinates.to_string()))
	}
}

/// Fails every lookup.
#[derive(Debug, Default)]
pub struct FailingResolver;

impl CoordinateResolver for FailingResolver {
	fn exists(&self, coordinates: &MavenCoordinates) -> p2m_rs::Result<bool> {
		Err(p2m_rs::Error::Validation(format!("lookup of {} failed", coordinates)))
	}
}
