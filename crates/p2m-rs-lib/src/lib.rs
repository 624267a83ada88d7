pub mod error;
pub use error::Result;
pub use error::Error;

pub mod metadb;
pub use metadb::MetaDB;
pub use metadb::InstallableUnit;

pub mod config;
pub use config::Config;

pub mod relationship_resolver;
pub mod installation;
pub mod publisher;
pub mod tasks;
