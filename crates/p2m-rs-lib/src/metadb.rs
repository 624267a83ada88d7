//! # p2 metadata
//!
//! Units and artifacts of every configured site, loaded once and only read afterwards.
//! Lookups search the sites in their configured order and return the first hit.

use regex::Regex;

mod artifact;
pub use artifact::Artifact;
pub use artifact::ArtifactKey;
pub use artifact::{BUNDLE_CLASSIFIER, FEATURE_CLASSIFIER};

mod capability;
pub use capability::ProvidedCapability;
pub use capability::RequiredCapability;
pub use capability::does_capability_fulfill_requirement;

mod coordinates;
pub use coordinates::MavenCoordinates;

pub mod properties;

mod unit;
pub use unit::InstallableUnit;

pub mod site;
pub use site::Site;
pub use site::SiteCatalog;

use crate::config::SiteConfig;

#[derive(Debug, Clone, Default)]
pub struct MetaDB {
	sites: Vec<Site>,
}

impl MetaDB {
	pub fn new(sites: Vec<Site>) -> Self {
		Self { sites }
	}

	/// Loads every site in parallel, the configured order is kept for lookups.
	pub async fn load(configs: &[SiteConfig], concurrency: usize) -> crate::Result<Self> {
		let mut loaded = crate::tasks::process_in_parallel(
			configs.iter().cloned().enumerate(),
			concurrency,
			|(i, config)| async move { Ok((i, Site::load(&config).await?)) },
		).await?;
		loaded.sort_by_key(|(i, _)| *i);
		Ok(Self::new(loaded.into_iter().map(|(_, site)| site).collect()))
	}

	pub fn sites(&self) -> &[Site] {
		&self.sites
	}

	pub fn find_unit(&self, id: &str) -> Option<&InstallableUnit> {
		self.sites.iter().find_map(|s| s.find_unit(id))
	}

	/// Every unit whose id matches `pattern`, one per id.
	///
	/// `pattern` should come from [`full_match_regex()`] so the whole id has to match.
	pub fn find_units_matching(&self, pattern: &Regex) -> Vec<&InstallableUnit> {
		let mut seen = std::collections::HashSet::new();
		self.sites.iter()
			.flat_map(|s| s.units())
			.filter(|u| pattern.is_match(&u.id))
			.filter(|u| seen.insert(u.id.as_str()))
			.collect()
	}

	pub fn find_unit_providing(&self, required: &RequiredCapability) -> Option<&InstallableUnit> {
		self.sites.iter().find_map(|s| s.find_unit_providing(required))
	}

	pub fn find_artifact(&self, id: &str) -> Option<&Artifact> {
		self.sites.iter().find_map(|s| s.find_artifact(id))
	}
}

/// Compiles `pattern` so it only matches a whole subject, capture group numbers are unchanged.
pub fn full_match_regex(pattern: &str) -> Result<Regex, regex::Error> {
	Regex::new(&format!(r"\A(?:{})\z", pattern))
}
