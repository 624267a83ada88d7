//! The graph of resolved units, kept separate from the resolving process.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use petgraph::prelude::*;
use serde::{Deserialize, Serialize};

use crate::metadb::*;

/// Units ending with this are source bundles shadowing a real bundle.
pub const SOURCE_SUFFIX: &str = ".source";
/// Synthetic unit describing the java runtime, never publishable.
pub const JRE_UNIT: &str = "a.jre.javase";
/// Wrappers of a feature's own jar, these hold nothing worth publishing.
pub const FEATURE_JAR_SUFFIX: &str = ".feature.jar";
/// Feature groups are published as a pom without a jar.
pub const FEATURE_GROUP_SUFFIX: &str = ".feature.group";

/// A unit after resolving, the node type of [`ResolvedGraph`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedUnit {
	pub id: String,
	pub version: String,
	pub name: Option<String>,
	pub description: Option<String>,
	/// `None` when no mapping gave the unit a group.
	pub maven: Option<MavenCoordinates>,
	/// The unit is available from a public repository and is only referenced.
	pub external: bool,
	pub artifact: Option<Artifact>,
	pub source_artifact: Option<Artifact>,
}

impl ResolvedUnit {
	pub(super) fn from_unit(unit: &InstallableUnit) -> Self {
		Self {
			id: unit.id.clone(),
			version: unit.version.clone(),
			name: unit.name.clone(),
			description: unit.description.clone(),
			..Default::default()
		}
	}

	pub fn is_feature_jar(&self) -> bool {
		self.id.ends_with(FEATURE_JAR_SUFFIX)
	}

	/// Feature groups carry only dependencies.
	pub fn is_pom_only(&self) -> bool {
		self.id.ends_with(FEATURE_GROUP_SUFFIX)
	}

	/// Coordinates when known, the id otherwise.
	pub fn label(&self) -> String {
		match &self.maven {
			Some(maven) => maven.to_string(),
			None => self.id.clone(),
		}
	}
}

impl PartialEq for ResolvedUnit {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id && self.version == other.version
	}
}

impl Eq for ResolvedUnit {}

impl std::fmt::Display for ResolvedUnit {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{},{}", self.id, self.version)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeData {
	/// The target is needed by the source.
	Depends,
	/// The target is used by the source when present.
	OptionalDepends,
}

impl std::fmt::Display for EdgeData {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			EdgeData::Depends => write!(f, "depends"),
			EdgeData::OptionalDepends => write!(f, "optional"),
		}
	}
}

/// Resolved units and the dependencies between them.
///
/// Units are owned by the graph and refer to each other by [`NodeIndex`]. There is exactly one node
/// per unit id and node indices follow the order units were first reached in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedGraph {
	graph: DiGraph<ResolvedUnit, EdgeData>,
	nodes_by_id: HashMap<String, NodeIndex>,
	roots: Vec<NodeIndex>,
}

impl ResolvedGraph {
	pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
		self.nodes_by_id.get(id).copied()
	}

	pub fn get(&self, id: &str) -> Option<&ResolvedUnit> {
		self.get_node_index(id).map(|i| &self.graph[i])
	}

	pub fn len(&self) -> usize {
		self.graph.node_count()
	}

	pub fn is_empty(&self) -> bool {
		self.graph.node_count() == 0
	}

	/// Every unit in the order it was first reached.
	pub fn units(&self) -> impl Iterator<Item = (NodeIndex, &ResolvedUnit)> {
		self.graph.node_indices().map(move |i| (i, &self.graph[i]))
	}

	/// Units resolved for the requested publish targets.
	pub fn roots(&self) -> &[NodeIndex] {
		&self.roots
	}

	/// Required dependencies of `src` in the order they were declared.
	pub fn dependencies(&self, src: NodeIndex) -> Vec<NodeIndex> {
		self.edges_of_kind(src, EdgeData::Depends)
	}

	/// Optional dependencies of `src` in the order they were declared.
	pub fn optional_dependencies(&self, src: NodeIndex) -> Vec<NodeIndex> {
		self.edges_of_kind(src, EdgeData::OptionalDepends)
	}

	fn edges_of_kind(&self, src: NodeIndex, kind: EdgeData) -> Vec<NodeIndex> {
		let mut edges: Vec<(EdgeIndex, NodeIndex)> = self.graph.edges_directed(src, Outgoing)
			.filter(|e| *e.weight() == kind)
			.map(|e| (e.id(), e.target()))
			.collect();
		/* Edges are never removed so their indices keep insertion order */
		edges.sort_by_key(|(e, _)| *e);
		edges.into_iter().map(|(_, target)| target).collect()
	}

	pub(super) fn add_unit(&mut self, unit: ResolvedUnit) -> NodeIndex {
		let id = unit.id.clone();
		let i = self.graph.add_node(unit);
		self.nodes_by_id.insert(id, i);
		i
	}

	pub(super) fn add_root(&mut self, root: NodeIndex) {
		if !self.roots.contains(&root) {
			self.roots.push(root);
		}
	}

	/// Adds an edge unless the same kind of edge already connects the nodes.
	pub(super) fn add_dependency(&mut self, src: NodeIndex, target: NodeIndex, kind: EdgeData) -> bool {
		let exists = self.graph.edges_directed(src, Outgoing).any(|e| e.target() == target && *e.weight() == kind);
		if !exists {
			self.graph.add_edge(src, target, kind);
		}
		!exists
	}

	pub(super) fn unit_mut(&mut self, i: NodeIndex) -> &mut ResolvedUnit {
		&mut self.graph[i]
	}

	/// Renders the graph as a Graphviz document. Optional dependencies are dashed.
	pub fn to_dot(&self) -> String {
		use petgraph::dot::{Config, Dot};

		format!("{}", Dot::with_attr_getters(
			&self.graph,
			&[Config::NodeNoLabel, Config::EdgeNoLabel],
			&|_, e| match e.weight() {
				EdgeData::Depends => String::new(),
				EdgeData::OptionalDepends => "style = dashed".to_string(),
			},
			&|_, (_, unit)| {
				let shape = if unit.external { "ellipse" } else { "box" };
				format!("label = \"{}\" shape = {}", unit.label().replace('"', "\\\""), shape)
			},
		))
	}

	/// Renders every root with its dependencies indented below it.
	///
	/// A unit already printed is listed again where it is reached but its dependencies are not.
	pub fn to_tree(&self) -> String {
		let mut out = String::new();
		let mut visited = HashSet::new();
		for &root in &self.roots {
			self.write_tree(&mut out, root, 0, &mut visited);
		}
		out
	}

	fn write_tree(&self, out: &mut String, src: NodeIndex, level: usize, visited: &mut HashSet<NodeIndex>) {
		let unit = &self.graph[src];
		let marker = if unit.external { " (external)" } else { "" };
		let _ = writeln!(out, "{}{}{}", "  ".repeat(level), unit.label(), marker);

		if !visited.insert(src) {
			return;
		}

		for dep in self.dependencies(src) {
			self.write_tree(out, dep, level + 1, visited);
		}
		for dep in self.optional_dependencies(src) {
			let _ = writeln!(out, "{}? {}", "  ".repeat(level + 1), self.graph[dep].label());
		}
	}
}

impl std::ops::Index<NodeIndex> for ResolvedGraph {
	type Output = ResolvedUnit;

	fn index(&self, index: NodeIndex) -> &Self::Output {
		&self.graph[index]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn unit(id: &str) -> ResolvedUnit {
		ResolvedUnit { id: id.to_string(), version: "1.0".to_string(), ..Default::default() }
	}

	#[test]
	fn graph_dependencies_keep_insertion_order() {
		let mut g = ResolvedGraph::default();
		let a = g.add_unit(unit("a"));
		let b = g.add_unit(unit("b"));
		let c = g.add_unit(unit("c"));
		let d = g.add_unit(unit("d"));
		g.add_dependency(a, c, EdgeData::Depends);
		g.add_dependency(a, b, EdgeData::Depends);
		g.add_dependency(a, d, EdgeData::OptionalDepends);
		g.add_dependency(a, b, EdgeData::OptionalDepends);
		assert_eq!(g.dependencies(a), vec![c, b]);
		assert_eq!(g.optional_dependencies(a), vec![d, b]);
	}

	#[test]
	fn graph_rejects_duplicate_edges() {
		let mut g = ResolvedGraph::default();
		let a = g.add_unit(unit("a"));
		let b = g.add_unit(unit("b"));
		assert!(g.add_dependency(a, b, EdgeData::Depends));
		assert!(!g.add_dependency(a, b, EdgeData::Depends));
		assert_eq!(g.dependencies(a), vec![b]);
	}

	#[test]
	fn graph_tree_does_not_expand_twice() {
		let mut g = ResolvedGraph::default();
		let a = g.add_unit(unit("a"));
		let b = g.add_unit(unit("b"));
		g.add_dependency(a, b, EdgeData::Depends);
		g.add_dependency(b, a, EdgeData::Depends);
		g.add_root(a);
		assert_eq!(g.to_tree(), "a\n  b\n    a\n");
	}

	#[test]
	fn graph_dot_labels_units() {
		let mut g = ResolvedGraph::default();
		let mut u = unit("org.slf4j.api");
		u.maven = Some(MavenCoordinates::new("org.slf4j", "slf4j-api", "1.7.36"));
		u.external = true;
		let a = g.add_unit(unit("a"));
		let b = g.add_unit(u);
		g.add_dependency(a, b, EdgeData::OptionalDepends);

		let dot = g.to_dot();
		assert!(dot.starts_with("digraph {"));
		assert!(dot.contains("label = \"org.slf4j:slf4j-api:1.7.36\" shape = ellipse"));
		assert!(dot.contains("style = dashed"));
	}
}
