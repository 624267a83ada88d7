//! Publisher
//!
//! Merges the load, resolve, download and deploy steps into [`publish`].

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::installation::deployment::{DeployFiles, Deployer};
use crate::installation::download;
use crate::relationship_resolver::{MavenRepositoryResolver, PublishRequest, PublishSet, ResolverBuilder};
use crate::{Config, MetaDB};

/// Resolves the configured publish targets against already loaded sites.
///
/// Queries the configured repository when [`Config::resolve()`] is enabled, this blocks.
pub fn resolve_blocking(metadb: &MetaDB, config: &Config) -> crate::Result<PublishSet> {
	let lookup;
	let mut builder = ResolverBuilder::new(metadb, config);
	if config.resolve() {
		lookup = MavenRepositoryResolver::from_config(config)?;
		builder = builder.coordinate_resolver(&lookup);
	}
	builder.build()?.resolve()
}

/// Loads every configured site and resolves the publish targets.
pub async fn resolve(config: Arc<Config>) -> crate::Result<PublishSet> {
	let metadb = MetaDB::load(config.sites(), config.concurrency()).await?;
	tokio::task::spawn_blocking(move || resolve_blocking(&metadb, &config)).await?
}

fn deploy_files(request: &PublishRequest, downloads: &HashMap<String, PathBuf>) -> DeployFiles {
	if request.is_pom_only() {
		return DeployFiles::default();
	}
	let local = |artifact: &Option<crate::metadb::Artifact>| artifact
		.as_ref()
		.and_then(|a| downloads.get(&a.file))
		.cloned();

	DeployFiles {
		jar: local(&request.unit.artifact),
		sources: local(&request.unit.source_artifact),
	}
}

/// Resolves, downloads and deploys every publishable unit.
///
/// # Returns
/// The publish set that was deployed.
pub async fn publish(config: Arc<Config>, deployer: Arc<dyn Deployer>) -> crate::Result<PublishSet> {
	let publish_set = resolve(config.clone()).await?;
	deploy(&config, &publish_set, deployer).await?;
	Ok(publish_set)
}

/// Downloads the artifacts of an already resolved publish set and deploys its units.
///
/// # Errors
/// The first error of either step. Deployments already running when one fails are allowed to finish.
pub async fn deploy(config: &Config, publish_set: &PublishSet, deployer: Arc<dyn Deployer>) -> crate::Result<()> {
	if publish_set.is_empty() {
		log::warn!("Nothing to publish");
		return Ok(());
	}

	let downloads = download::download_artifacts(config, publish_set.artifacts()).await?;

	let requests = publish_set.requests();
	log::info!("Publishing {} units", requests.len());
	crate::tasks::process_in_parallel(requests, config.concurrency(), |request| {
		let deployer = deployer.clone();
		let files = deploy_files(&request, &downloads);
		async move {
			tokio::task::spawn_blocking(move || deployer.deploy(&request, &files)).await?
		}
	}).await?;

	Ok(())
}
