use super::*;

/// Everything needed to publish one unit.
#[derive(Debug, Clone)]
pub struct PublishRequest {
	pub unit: ResolvedUnit,
	pub dependencies: Vec<MavenCoordinates>,
	pub optional_dependencies: Vec<MavenCoordinates>,
}

impl PublishRequest {
	pub fn coordinates(&self) -> Option<&MavenCoordinates> {
		self.unit.maven.as_ref()
	}

	pub fn is_pom_only(&self) -> bool {
		self.unit.is_pom_only()
	}
}

/// A completed resolve and the units selected from it for publishing.
pub struct PublishSet {
	graph: ResolvedGraph,
	units: Vec<NodeIndex>,
}

impl PublishSet {
	/// Selects the units to publish and applies `group_override` to them.
	///
	/// External units and feature jars are left out, as are units without coordinates.
	pub(super) fn new(mut graph: ResolvedGraph, group_override: Option<&str>) -> Self {
		let units: Vec<NodeIndex> = graph.units()
			.filter(|(_, unit)| {
				if unit.external || unit.is_feature_jar() {
					return false;
				}
				if unit.maven.is_none() {
					log::warn!("No maven coordinates found for {}", unit.id);
					return false;
				}
				true
			})
			.map(|(i, _)| i)
			.collect();

		if let Some(group) = group_override {
			for &i in &units {
				if let Some(maven) = &mut graph.unit_mut(i).maven {
					maven.group_id = Some(group.to_string());
				}
			}
		}

		Self { graph, units }
	}

	pub fn graph(&self) -> &ResolvedGraph {
		&self.graph
	}

	pub fn units(&self) -> impl Iterator<Item = &ResolvedUnit> {
		self.units.iter().map(|&i| &self.graph[i])
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	/// Primary and source artifacts of every unit to publish.
	pub fn artifacts(&self) -> Vec<Artifact> {
		self.units()
			.flat_map(|u| [u.artifact.as_ref(), u.source_artifact.as_ref()])
			.flatten()
			.cloned()
			.collect()
	}

	/// One request per unit to publish, dependencies without coordinates are dropped.
	pub fn requests(&self) -> Vec<PublishRequest> {
		let coordinates = |deps: Vec<NodeIndex>| deps.into_iter()
			.filter_map(|d| self.graph[d].maven.clone())
			.collect::<Vec<_>>();

		self.units.iter()
			.map(|&i| PublishRequest {
				unit: self.graph[i].clone(),
				dependencies: coordinates(self.graph.dependencies(i)),
				optional_dependencies: coordinates(self.graph.optional_dependencies(i)),
			})
			.collect()
	}
}
