use super::*;

/// Answers every lookup with "missing", used when lookups are switched off.
struct NoLookup;

impl CoordinateResolver for NoLookup {
	fn exists(&self, _coordinates: &MavenCoordinates) -> crate::Result<bool> {
		Ok(false)
	}
}

static NO_LOOKUP: NoLookup = NoLookup;

pub struct ResolverBuilder<'a> {
	metadb: &'a MetaDB,
	config: &'a Config,
	coordinate_resolver: Option<&'a dyn CoordinateResolver>,
	targets: Option<Vec<PublishRule>>,
}

impl<'a> ResolverBuilder<'a> {
	pub fn new(metadb: &'a MetaDB, config: &'a Config) -> Self {
		Self {
			metadb,
			config,
			coordinate_resolver: None,
			targets: None,
		}
	}

	/// Repository queried for external units when [`Config::resolve()`] is enabled.
	pub fn coordinate_resolver(mut self, resolver: &'a dyn CoordinateResolver) -> Self {
		self.coordinate_resolver = Some(resolver);
		self
	}

	/// Replaces the publish targets of the config.
	pub fn targets(mut self, targets: impl IntoIterator<Item = PublishRule>) -> Self {
		self.targets = Some(targets.into_iter().collect());
		self
	}

	/// # Errors
	/// - [`Regex`](crate::Error::Regex) when a rule pattern is invalid.
	/// - [`Validation`](crate::Error::Validation) when lookups are enabled without a coordinate resolver.
	pub fn build(self) -> crate::Result<Resolver<'a>> {
		let coordinate_resolver: &'a dyn CoordinateResolver = match self.coordinate_resolver {
			Some(r) => r,
			None if self.config.resolve() => {
				return Err(crate::Error::Validation("lookups are enabled but no coordinate resolver was given".to_string()));
			},
			None => &NO_LOOKUP,
		};

		Ok(Resolver::new(
			self.metadb,
			CoordinateMapper::new(self.config.mappings())?,
			Policy::from_config(self.config)?,
			coordinate_resolver,
			self.config.resolve(),
			self.config.group_override().map(str::to_string),
			self.targets.unwrap_or_else(|| self.config.publish().to_vec()),
		))
	}
}
