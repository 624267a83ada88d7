use std::io::Write;
use std::sync::Arc;

use p2m_rs::installation::deployment::DryRunDeployer;
use p2m_rs::relationship_resolver::PublishSet;

const USAGE: &str = "Usage: p2m-rs-terminal [options] <config.json> [resolve|tree|dot|publish]";

#[tokio::main]
async fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased vebosity");
		opts.optflag( "y", "yes",        "Publish without asking");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(args.get(1..).unwrap_or_default()) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage(USAGE));
			return;
		}

		parsed_options
	};

	if parsed_options.opt_present("v") {
		env_logger::Builder::from_default_env()
			.filter_level(log::LevelFilter::Debug)
			.init();
	} else {
		env_logger::init();
	}

	let Some(config_path) = parsed_options.free.first() else {
		eprintln!("{}", opts.usage(USAGE));
		return;
	};

	let config = match p2m_rs::Config::load_from_disk(config_path) {
		Ok(config) => Arc::new(config),
		Err(e) => {
			log::error!("Failed to read config file {}: {}", config_path, e);
			return;
		}
	};

	let command = parsed_options.free.get(1).map(String::as_str).unwrap_or("resolve");
	let result = match command {
		"resolve" => p2m_rs::publisher::resolve(config).await.map(|set| print_publish_set(&set)).map_err(Error::from),
		"tree" => p2m_rs::publisher::resolve(config).await.map(|set| print!("{}", set.graph().to_tree())).map_err(Error::from),
		"dot" => p2m_rs::publisher::resolve(config).await.map(|set| print!("{}", set.graph().to_dot())).map_err(Error::from),
		"publish" => publish(config, parsed_options.opt_present("y")).await,
		other => Err(Error::UnknownCommand(other.to_string())),
	};

	if let Err(e) = result {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn print_publish_set(set: &PublishSet) {
	println!("Publishing {} of {} resolved units:", set.units().count(), set.graph().len());
	for request in set.requests() {
		let kind = if request.is_pom_only() { "pom" } else { "jar" };
		println!("\t{} ({}) from {}", request.unit.label(), kind, request.unit.id);
		for dependency in &request.dependencies {
			println!("\t\t{}", dependency);
		}
		for dependency in &request.optional_dependencies {
			println!("\t\t{} (optional)", dependency);
		}
	}
}

async fn publish(config: Arc<p2m_rs::Config>, assume_yes: bool) -> Result<(), Error> {
	let set = p2m_rs::publisher::resolve(config.clone()).await?;
	print_publish_set(&set);

	if !assume_yes {
		let stdin = std::io::stdin();
		print!("Publish these units? [(y)/n] ");
		let _ = std::io::stdout().flush();
		loop {
			let mut input = String::new();
			let _ = stdin.read_line(&mut input);
			let input = input.trim().to_lowercase();
			if input == "y" || input.is_empty() {
				break;
			} else if input == "n" {
				return Err(Error::UserCancelled);
			} else {
				println!("\nInput invalid.")
			}
		}
	}

	p2m_rs::publisher::deploy(&config, &set, Arc::new(DryRunDeployer)).await?;
	log::info!("Published {} units", set.units().count());
	Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("p2m-rs error: {0}")]
	P2mError(#[from] p2m_rs::Error),
	#[error("Unknown command {0}")]
	UnknownCommand(String),
	#[error("User cancelled an action")]
	UserCancelled,
}
