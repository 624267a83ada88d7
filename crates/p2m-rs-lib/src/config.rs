//! Runtime configuration.
//!
//! A [`Config`] is built once, usually with [`Config::load_from_disk()`], and then only read.
//! Every component receives it by reference, there is no global state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MAVEN_CENTRAL: &str = "https://repo.maven.apache.org/maven2";

/// A metadata repository to read units and artifacts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
	pub name: String,
	/// Base url of the site, artifact download urls are templated from it.
	pub url: String,
	/// Local JSON catalog holding the units and artifacts of the site.
	pub catalog: PathBuf,
}

/// Derives coordinate fields from a unit.
///
/// `pattern` must match the whole subject, templates may refer to its capture groups with `$1` or `${name}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MappingRule {
	pub pattern: String,
	#[serde(default)]
	pub group_id: Option<String>,
	#[serde(default)]
	pub artifact_id: Option<String>,
	#[serde(default)]
	pub version: Option<String>,
}

/// Selects units by exact id or by a pattern over their coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRule {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub pattern: Option<String>,
}

impl PublishRule {
	pub fn from_id(id: impl Into<String>) -> Self {
		Self { id: Some(id.into()), pattern: None }
	}

	pub fn from_pattern(pattern: impl Into<String>) -> Self {
		Self { id: None, pattern: Some(pattern.into()) }
	}
}

impl std::fmt::Display for PublishRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match (&self.id, &self.pattern) {
			(Some(id), _) => write!(f, "{}", id),
			(None, Some(pattern)) => write!(f, "/{}/", pattern),
			(None, None) => write!(f, "<empty rule>"),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenConfig {
	/// When `false` every unit with coordinates is assumed to already be public and no lookup is made.
	#[serde(default)]
	pub resolve: bool,
	/// Replaces the group of every published unit.
	#[serde(default)]
	pub group: Option<String>,
	/// Repository queried when `resolve` is enabled.
	#[serde(default = "default_repository")]
	pub repository: String,
}

impl Default for MavenConfig {
	fn default() -> Self {
		Self {
			resolve: false,
			group: None,
			repository: default_repository(),
		}
	}
}

fn default_repository() -> String {
	MAVEN_CENTRAL.to_string()
}

fn default_download_dir() -> PathBuf {
	#[cfg(target_os = "windows")]
	let path = std::env::var("LOCALAPPDATA").map(PathBuf::from).unwrap_or_else(|_| std::env::temp_dir());

	#[cfg(not(target_os = "windows"))]
	let path = if let Ok(e) = std::env::var("XDG_CACHE_HOME") {
		PathBuf::from(e)
	} else if let Ok(home) = std::env::var("HOME") {
		PathBuf::from(home).join(".cache")
	} else {
		std::env::temp_dir()
	};

	path.join("p2m-rs").join("downloads")
}

fn default_concurrency() -> usize {
	8
}

fn default_https_only() -> bool {
	true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
	#[serde(default)]
	sites: Vec<SiteConfig>,
	#[serde(default)]
	mappings: Vec<MappingRule>,
	#[serde(default)]
	exclude: Vec<PublishRule>,
	#[serde(default)]
	candidates: Vec<PublishRule>,
	#[serde(default)]
	publish: Vec<PublishRule>,
	#[serde(default)]
	maven: MavenConfig,
	#[serde(default = "default_download_dir")]
	download_dir: PathBuf,
	#[serde(default = "default_concurrency")]
	concurrency: usize,
	#[serde(default = "default_https_only")]
	https_only: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			sites: Default::default(),
			mappings: Default::default(),
			exclude: Default::default(),
			candidates: Default::default(),
			publish: Default::default(),
			maven: Default::default(),
			download_dir: default_download_dir(),
			concurrency: default_concurrency(),
			https_only: default_https_only(),
		}
	}
}

impl Config {
	/// Reads a JSON config file and validates it.
	///
	/// Relative site catalog paths are resolved against the directory of the config file.
	/// # Errors
	/// - [`IO`](crate::Error::IO) when the file can't be read.
	/// - [`SerdeJSON`](crate::Error::SerdeJSON) when the file is not a valid config.
	/// - [`Regex`](crate::Error::Regex) or [`Validation`](crate::Error::Validation) from [`Config::validate()`].
	pub fn load_from_disk(path: impl AsRef<Path>) -> crate::Result<Config> {
		let path = path.as_ref();
		log::debug!("Reading config from {}", path.display());
		let text = std::fs::read_to_string(path)?;
		let mut config = Self::load_from_str(&text)?;
		if let Some(base) = path.parent() {
			for site in &mut config.sites {
				if site.catalog.is_relative() {
					site.catalog = base.join(&site.catalog);
				}
			}
		}
		Ok(config)
	}

	pub fn load_from_str(text: &str) -> crate::Result<Config> {
		let config: Config = serde_json::from_str(text)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks every rule pattern compiles and the settings are usable.
	pub fn validate(&self) -> crate::Result<()> {
		for rule in &self.mappings {
			crate::metadb::full_match_regex(&rule.pattern)?;
		}
		for rule in self.exclude.iter().chain(&self.candidates).chain(&self.publish) {
			if rule.id.is_none() && rule.pattern.is_none() {
				return Err(crate::Error::Validation("rule has neither an id nor a pattern".to_string()));
			}
			if let Some(pattern) = &rule.pattern {
				crate::metadb::full_match_regex(pattern)?;
			}
		}
		if self.concurrency == 0 {
			return Err(crate::Error::Validation("concurrency must be at least 1".to_string()));
		}
		Ok(())
	}

	pub fn sites(&self) -> &[SiteConfig] {
		&self.sites
	}
	pub fn set_sites(&mut self, sites: Vec<SiteConfig>) {
		self.sites = sites;
	}

	pub fn mappings(&self) -> &[MappingRule] {
		&self.mappings
	}
	pub fn set_mappings(&mut self, mappings: Vec<MappingRule>) {
		self.mappings = mappings;
	}

	pub fn exclude(&self) -> &[PublishRule] {
		&self.exclude
	}
	pub fn set_exclude(&mut self, exclude: Vec<PublishRule>) {
		self.exclude = exclude;
	}

	pub fn candidates(&self) -> &[PublishRule] {
		&self.candidates
	}
	pub fn set_candidates(&mut self, candidates: Vec<PublishRule>) {
		self.candidates = candidates;
	}

	/// Root units of the resolve.
	pub fn publish(&self) -> &[PublishRule] {
		&self.publish
	}
	pub fn set_publish(&mut self, publish: Vec<PublishRule>) {
		self.publish = publish;
	}

	pub fn resolve(&self) -> bool {
		self.maven.resolve
	}
	pub fn set_resolve(&mut self, resolve: bool) {
		self.maven.resolve = resolve;
	}

	pub fn group_override(&self) -> Option<&str> {
		self.maven.group.as_deref()
	}
	pub fn set_group_override(&mut self, group: Option<String>) {
		self.maven.group = group;
	}

	pub fn repository(&self) -> &str {
		&self.maven.repository
	}
	pub fn set_repository(&mut self, repository: String) {
		self.maven.repository = repository;
	}

	pub fn download_dir(&self) -> &Path {
		&self.download_dir
	}
	pub fn set_download_dir(&mut self, download_dir: PathBuf) {
		self.download_dir = download_dir;
	}

	/// Upper bound of tasks running at once when loading, downloading and publishing.
	pub fn concurrency(&self) -> usize {
		self.concurrency
	}
	pub fn set_concurrency(&mut self, concurrency: usize) {
		self.concurrency = concurrency.max(1);
	}

	pub fn https_only(&self) -> bool {
		self.https_only
	}
	pub fn set_https_only(&mut self, https_only: bool) {
		self.https_only = https_only;
	}
}
