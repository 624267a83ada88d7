use std::sync::{Arc, Mutex};

use p2m_rs::config::PublishRule;
use p2m_rs::installation::deployment::*;
use p2m_rs::relationship_resolver::PublishRequest;
use p2m_rs_test_utils::*;

#[derive(Default)]
struct RecordingDeployer {
	deployed: Mutex<Vec<(String, bool, bool)>>,
}

impl Deployer for RecordingDeployer {
	fn deploy(&self, request: &PublishRequest, files: &DeployFiles) -> p2m_rs::Result<()> {
		let coordinates = request.coordinates().map(|c| c.to_string()).unwrap_or_default();
		self.deployed.lock().expect("poisoned").push((coordinates, files.jar.is_some(), files.sources.is_some()));
		Ok(())
	}
}

struct FailingDeployer;

impl Deployer for FailingDeployer {
	fn deploy(&self, request: &PublishRequest, _files: &DeployFiles) -> p2m_rs::Result<()> {
		Err(p2m_rs::Error::Validation(format!("refusing {}", request.unit.id)))
	}
}

/// Writes a catalog and pre-populates the download dir so nothing is fetched.
fn setup(dir: &std::path::Path) -> p2m_rs::Config {
	let _ = env_logger::builder().is_test(true).try_init();

	let catalog = CatalogBuilder::new()
		.group("org.acme.f.feature.group", &["org.acme.a"])
		.unit("org.acme.a", &["org.acme.b"])
		.unit("org.acme.a.source", &[])
		.unit("org.acme.b", &[])
		.build();
	let site = write_catalog(dir, "acme", &catalog).expect("failed to write catalog.");

	let download_dir = dir.join("downloads");
	for file in ["org.acme.a_1.0.0.jar", "org.acme.a.source_1.0.0.jar", "org.acme.b_1.0.0.jar"] {
		let path = download_dir.join("acme").join("plugins").join(file);
		std::fs::create_dir_all(path.parent().expect("no parent")).expect("failed to create dir.");
		std::fs::write(&path, file).expect("failed to write artifact.");
	}

	let mut config = p2m_rs::Config::default();
	config.set_sites(vec![site]);
	config.set_mappings(vec![prefix_mapping("org.acme")]);
	config.set_candidates(vec![PublishRule::from_pattern(r"org\.acme:.*")]);
	config.set_publish(vec![PublishRule::from_id("org.acme.f.feature.group")]);
	config.set_group_override(Some("com.mirror".to_string()));
	config.set_download_dir(download_dir);
	config.set_concurrency(2);
	config
}

#[tokio::test]
async fn publish_deploys_every_unit() {
	let dir = tempfile::tempdir().expect("failed to create temp dir.");
	let config = Arc::new(setup(dir.path()));
	let deployer = Arc::new(RecordingDeployer::default());

	let set = p2m_rs::publisher::publish(config, deployer.clone()).await.expect("failed to publish.");
	assert_eq!(set.units().count(), 3);

	let mut deployed = deployer.deployed.lock().expect("poisoned").clone();
	deployed.sort();
	assert_eq!(deployed, vec![
		("com.mirror:org.acme.a:1.0.0".to_string(), true, true),
		("com.mirror:org.acme.b:1.0.0".to_string(), true, false),
		("com.mirror:org.acme.f.feature.group:1.0.0".to_string(), false, false),
	]);
}

#[tokio::test]
async fn publish_stops_at_first_failure() {
	let dir = tempfile::tempdir().expect("failed to create temp dir.");
	let config = Arc::new(setup(dir.path()));

	let result = p2m_rs::publisher::publish(config, Arc::new(FailingDeployer)).await;
	assert!(matches!(result, Err(p2m_rs::Error::Validation(_))));
}

#[tokio::test]
async fn resolve_loads_and_resolves() {
	let dir = tempfile::tempdir().expect("failed to create temp dir.");
	let config = Arc::new(setup(dir.path()));

	let set = p2m_rs::publisher::resolve(config).await.expect("failed to resolve.");
	let roots = set.graph().roots();
	assert_eq!(roots.len(), 1);
	assert_eq!(set.graph()[roots[0]].id, "org.acme.f.feature.group");
}
