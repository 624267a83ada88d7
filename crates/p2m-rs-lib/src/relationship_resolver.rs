//! Turns publish targets into a graph of resolved units.
//!
//! # Usage
//! 1. Create a [`ResolverBuilder`] from a [`MetaDB`] and a [`Config`].
//! 1. Give it a [`CoordinateResolver`] if [`Config::resolve()`] is enabled.
//! 1. [`ResolverBuilder::build()`] to get a [`Resolver`].
//! 1. [`Resolver::resolve()`] to get a [`PublishSet`] listing the units to publish.
//!
//! Requirements are matched to units by capability name only, the first unit providing a capability is used.
//! Units that can't be found are skipped with a warning unless they were requested directly.

use petgraph::prelude::*;

use crate::config::{Config, PublishRule};
use crate::metadb::*;

mod coordinate_mapper;
pub use coordinate_mapper::CoordinateMapper;

mod policy;
pub use policy::Policy;

mod external;
pub use external::CoordinateResolver;
pub use external::ExternalCheck;
pub use external::MavenRepositoryResolver;

mod resolved_graph;
pub use resolved_graph::ResolvedGraph;
pub use resolved_graph::ResolvedUnit;
pub use resolved_graph::EdgeData;
pub use resolved_graph::{FEATURE_GROUP_SUFFIX, FEATURE_JAR_SUFFIX, JRE_UNIT, SOURCE_SUFFIX};

mod resolver_builder;
pub use resolver_builder::ResolverBuilder;
mod unit_resolver;
pub use unit_resolver::Resolver;
mod finalized_resolver;
pub use finalized_resolver::PublishSet;
pub use finalized_resolver::PublishRequest;
