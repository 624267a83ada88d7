use super::*;

/// Walks the requirements of the publish targets and builds a [`ResolvedGraph`].
///
/// Each call to [`Resolver::resolve()`] starts from an empty graph. While resolving, a unit is added to
/// the graph before its requirements are followed, so a requirement cycle leading back to it finds the
/// existing node instead of recursing forever.
pub struct Resolver<'a> {
	metadb: &'a MetaDB,
	mapper: CoordinateMapper,
	policy: Policy,
	coordinate_resolver: &'a dyn CoordinateResolver,
	resolve: bool,
	group_override: Option<String>,
	targets: Vec<PublishRule>,
}

impl<'a> Resolver<'a> {
	pub(super) fn new(
		metadb: &'a MetaDB,
		mapper: CoordinateMapper,
		policy: Policy,
		coordinate_resolver: &'a dyn CoordinateResolver,
		resolve: bool,
		group_override: Option<String>,
		targets: Vec<PublishRule>,
	) -> Self {
		Self { metadb, mapper, policy, coordinate_resolver, resolve, group_override, targets }
	}

	/// Resolves every target and selects the units to publish.
	///
	/// # Errors
	/// - [`NoSuchUnit`](crate::Error::NoSuchUnit) when a target is in none of the sites.
	/// - [`Regex`](crate::Error::Regex) when a target pattern is invalid.
	pub fn resolve(&self) -> crate::Result<PublishSet> {
		let mut graph = ResolvedGraph::default();

		for target in &self.targets {
			for unit in self.find_target_units(target)? {
				match self.resolve_unit(&mut graph, unit) {
					Some(i) => graph.add_root(i),
					None => log::warn!("Publish target {} is excluded", unit.id),
				}
			}
		}

		log::info!("Resolved {} units from {} targets", graph.len(), self.targets.len());
		Ok(PublishSet::new(graph, self.group_override.as_deref()))
	}

	fn find_target_units(&self, target: &PublishRule) -> crate::Result<Vec<&'a InstallableUnit>> {
		let metadb: &'a MetaDB = self.metadb;
		let units = match (&target.id, &target.pattern) {
			(Some(id), _) => metadb.find_unit(id).into_iter().collect(),
			(None, Some(pattern)) => metadb.find_units_matching(&full_match_regex(pattern)?),
			(None, None) => vec![],
		};
		if units.is_empty() {
			return Err(crate::Error::NoSuchUnit(target.to_string()));
		}
		Ok(units)
	}

	/// Resolves `unit` and everything it requires into `graph`.
	///
	/// Returns the node of the unit, the existing one if the unit id was resolved before.
	/// Returns `None` if the unit is excluded, excluded units are never added to the graph.
	pub fn resolve_unit(&self, graph: &mut ResolvedGraph, unit: &InstallableUnit) -> Option<NodeIndex> {
		if let Some(i) = graph.get_node_index(&unit.id) {
			return Some(i);
		}

		log::info!("Resolving {}", unit.id);

		let artifact = self.metadb.find_artifact(&unit.id);

		let mut resolved = ResolvedUnit::from_unit(unit);
		let hint = artifact.and_then(|a| a.maven.as_ref()).or(unit.maven.as_ref());
		resolved.maven = self.mapper.derive_coordinates(hint, &unit.id, &unit.version);

		if self.policy.is_excluded(&resolved.id, resolved.maven.as_ref()) {
			log::info!("Excluding {}", unit.id);
			return None;
		}

		let external = ExternalCheck::new(&self.policy, self.coordinate_resolver, self.resolve)
			.is_external(&resolved.id, resolved.maven.as_ref());
		if external {
			log::debug!("Using {} from the public repository", resolved.label());
			resolved.external = true;
			return Some(graph.add_unit(resolved));
		}

		resolved.artifact = artifact.cloned();
		resolved.source_artifact = self.metadb.find_artifact(&format!("{}{}", unit.id, SOURCE_SUFFIX)).cloned();

		/* Added before following requirements to stop cycles */
		let src = graph.add_unit(resolved);

		for requirement in &unit.requires {
			let Some(required) = self.metadb.find_unit_providing(requirement) else {
				if !requirement.optional {
					log::warn!("No dependency found for {} in {}", requirement, unit.id);
				}
				continue;
			};

			if required.id.ends_with(SOURCE_SUFFIX) || required.id == JRE_UNIT {
				continue;
			}

			let Some(dep) = self.resolve_unit(graph, required) else {
				log::warn!("No dependency found for {} in {}", requirement, unit.id);
				continue;
			};

			if graph[dep].maven.is_some() && graph[dep].maven == graph[src].maven {
				continue;
			}

			let kind = if requirement.optional { EdgeData::OptionalDepends } else { EdgeData::Depends };
			graph.add_dependency(src, dep, kind);
		}

		Some(src)
	}
}
