//! A single p2 metadata repository.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::*;
use super::properties::*;
use crate::config::SiteConfig;

/// A unit as it is stored in a catalog file, before properties are interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRecord {
	pub id: String,
	pub version: String,
	#[serde(default)]
	pub properties: HashMap<String, String>,
	#[serde(default)]
	pub provides: Vec<ProvidedCapability>,
	#[serde(default)]
	pub requires: Vec<RequiredCapability>,
	#[serde(default)]
	pub artifacts: Vec<ArtifactKey>,
}

/// An artifact as it is stored in a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtifactRecord {
	pub id: String,
	pub version: String,
	#[serde(default)]
	pub classifier: String,
	#[serde(default)]
	pub properties: HashMap<String, String>,
}

/// The content of a catalog file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteCatalog {
	#[serde(default)]
	pub units: Vec<UnitRecord>,
	#[serde(default)]
	pub artifacts: Vec<ArtifactRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct Site {
	name: String,
	url: String,
	units: Vec<InstallableUnit>,
	artifacts: Vec<Artifact>,

	/* First unit or artifact for each id, lookups return the earliest entry in catalog order */
	units_by_id: HashMap<String, usize>,
	artifacts_by_id: HashMap<String, usize>,
}

impl Site {
	/// Builds a site from an already parsed catalog.
	pub fn from_catalog(name: impl Into<String>, url: impl Into<String>, catalog: SiteCatalog) -> Self {
		let name = name.into();
		let url = url.into();

		let units: Vec<InstallableUnit> = catalog.units.into_iter().map(|r| read_unit(&name, r)).collect();
		let artifacts: Vec<Artifact> = catalog.artifacts.into_iter().map(|r| read_artifact(&name, &url, r)).collect();

		let mut units_by_id = HashMap::new();
		for (i, unit) in units.iter().enumerate() {
			units_by_id.entry(unit.id.clone()).or_insert(i);
		}

		let mut artifacts_by_id = HashMap::new();
		for (i, artifact) in artifacts.iter().enumerate() {
			artifacts_by_id.entry(artifact.id.clone()).or_insert(i);
		}

		log::debug!("Site {} has {} units and {} artifacts", name, units.len(), artifacts.len());

		Self { name, url, units, artifacts, units_by_id, artifacts_by_id }
	}

	/// Reads the catalog named in `config`.
	/// # Errors
	/// - [`IO`](crate::Error::IO) when the catalog can't be read.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the catalog is malformed.
	pub async fn load(config: &SiteConfig) -> crate::Result<Site> {
		log::info!("Loading site {}", config.name);
		let text = tokio::fs::read_to_string(&config.catalog).await?;
		let catalog: SiteCatalog = serde_json::from_str(&text)?;
		Ok(Site::from_catalog(config.name.clone(), config.url.clone(), catalog))
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn units(&self) -> &[InstallableUnit] {
		&self.units
	}

	pub fn artifacts(&self) -> &[Artifact] {
		&self.artifacts
	}

	pub fn find_unit(&self, id: &str) -> Option<&InstallableUnit> {
		self.units_by_id.get(id).map(|&i| &self.units[i])
	}

	/// Finds the first unit in catalog order with a capability satisfying `required`.
	pub fn find_unit_providing(&self, required: &RequiredCapability) -> Option<&InstallableUnit> {
		self.units.iter().find(|u| u.does_fulfill_requirement(required))
	}

	pub fn find_artifact(&self, id: &str) -> Option<&Artifact> {
		self.artifacts_by_id.get(id).map(|&i| &self.artifacts[i])
	}
}

fn read_unit(site: &str, record: UnitRecord) -> InstallableUnit {
	let mut properties = record.properties;
	localize(&mut properties);

	InstallableUnit {
		name: get_property(&properties, NAME_PROPERTY, &[]).map(str::to_string),
		description: get_property(&properties, DESCRIPTION_PROPERTY, &[]).map(str::to_string),
		maven: MavenCoordinates::from_properties(&properties),
		id: record.id,
		version: record.version,
		provides: record.provides,
		requires: record.requires,
		artifacts: record.artifacts,
		properties,
		site: site.to_string(),
	}
}

fn read_artifact(site_name: &str, site_url: &str, record: ArtifactRecord) -> Artifact {
	let mut properties = record.properties;
	localize(&mut properties);

	let mut artifact = Artifact {
		maven: MavenCoordinates::from_properties(&properties),
		sha1: get_property(&properties, "download.checksum.sha-1", &[]).map(str::to_string),
		sha256: get_property(&properties, "download.checksum.sha-256", &[]).map(str::to_string),
		sha512: get_property(&properties, "download.checksum.sha-512", &[]).map(str::to_string),
		size: get_property(&properties, "download.size", &[]).and_then(|s| s.trim().parse().ok()),
		id: record.id,
		version: record.version,
		classifier: record.classifier,
		properties,
		site: site_name.to_string(),
		..Default::default()
	};
	artifact.set_location(site_name, site_url);
	artifact
}

#[cfg(test)]
mod tests {
	use super::*;

	fn catalog() -> SiteCatalog {
		serde_json::from_str(r#"{
			"units": [
				{
					"id": "org.slf4j.api", "version": "1.7.36",
					"properties": {
						"org.eclipse.equinox.p2.name": "%bundleName",
						"df_LT.bundleName": "SLF4J API",
						"maven-groupId": "org.slf4j", "maven-artifactId": "slf4j-api", "maven-version": "1.7.36"
					},
					"provides": [{ "namespace": "osgi.bundle", "name": "org.slf4j.api", "version": "1.7.36" }],
					"requires": [{ "namespace": "java.package", "name": "org.slf4j.impl", "range": "[1.7,2)", "optional": true }]
				},
				{
					"id": "org.slf4j.api", "version": "2.0.0",
					"provides": [{ "namespace": "osgi.bundle", "name": "org.slf4j.api", "version": "2.0.0" }]
				}
			],
			"artifacts": [
				{ "id": "org.slf4j.api", "version": "1.7.36", "classifier": "osgi.bundle", "properties": { "download.size": "41125", "download.checksum.sha-512": "abc" } }
			]
		}"#).unwrap()
	}

	#[test]
	fn site_reads_unit_properties() {
		let site = Site::from_catalog("orbit", "https://example.org/orbit", catalog());
		let unit = site.find_unit("org.slf4j.api").unwrap();
		assert_eq!(unit.version, "1.7.36");
		assert_eq!(unit.name.as_deref(), Some("SLF4J API"));
		assert_eq!(unit.maven.as_ref().unwrap().to_string(), "org.slf4j:slf4j-api:1.7.36");
		assert_eq!(unit.site, "orbit");
		assert!(unit.requires[0].optional);
	}

	#[test]
	fn site_finds_first_provider() {
		let site = Site::from_catalog("orbit", "https://example.org/orbit", catalog());
		let unit = site.find_unit_providing(&RequiredCapability::new("osgi.bundle", "org.slf4j.api")).unwrap();
		assert_eq!(unit.version, "1.7.36");
		assert!(site.find_unit_providing(&RequiredCapability::new("java.package", "org.slf4j.api")).is_none());
	}

	#[test]
	fn site_provider_matches_any_capability_ignoring_range() {
		let catalog: SiteCatalog = serde_json::from_str(r#"{
			"units": [
				{
					"id": "org.slf4j.api", "version": "1.7.36",
					"provides": [
						{ "namespace": "osgi.bundle", "name": "org.slf4j.api", "version": "1.7.36" },
						{ "namespace": "java.package", "name": "org.slf4j", "version": "1.7.36" }
					]
				}
			]
		}"#).unwrap();
		let site = Site::from_catalog("orbit", "https://example.org/orbit", catalog);

		let mut required = RequiredCapability::new("java.package", "org.slf4j");
		required.range = "[2.0.0,3.0.0)".to_string();
		let unit = site.find_unit_providing(&required).unwrap();
		assert_eq!(unit.id, "org.slf4j.api");
		assert!(unit.does_fulfill_requirement(&required));
	}

	#[test]
	fn site_reads_artifact_details() {
		let site = Site::from_catalog("orbit", "https://example.org/orbit", catalog());
		let artifact = site.find_artifact("org.slf4j.api").unwrap();
		assert_eq!(artifact.size, Some(41125));
		assert_eq!(artifact.sha512.as_deref(), Some("abc"));
		assert_eq!(artifact.sha256, None);
		assert_eq!(artifact.url, "https://example.org/orbit/plugins/org.slf4j.api_1.7.36.jar");
	}
}
