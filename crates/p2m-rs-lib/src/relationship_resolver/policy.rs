//! Exclude and candidate rules.

use regex::Regex;

use crate::config::{Config, PublishRule};
use crate::metadb::*;

#[derive(Debug, Clone)]
struct Rule {
	id: Option<String>,
	pattern: Option<Regex>,
}

impl Rule {
	fn compile(rule: &PublishRule) -> crate::Result<Self> {
		Ok(Self {
			id: rule.id.clone(),
			pattern: rule.pattern.as_deref().map(full_match_regex).transpose()?,
		})
	}

	/// Matches the id exactly, or the pattern against the coordinates when present and the id otherwise.
	fn is_match(&self, id: &str, maven: Option<&MavenCoordinates>) -> bool {
		if self.id.as_deref() == Some(id) {
			return true;
		}
		match (&self.pattern, maven) {
			(Some(pattern), Some(maven)) => pattern.is_match(&maven.to_string()),
			(Some(pattern), None) => pattern.is_match(id),
			(None, _) => false,
		}
	}
}

/// Compiled rule sets deciding which units are dropped and which are always republished.
#[derive(Debug, Clone)]
pub struct Policy {
	exclude: Vec<Rule>,
	candidates: Vec<Rule>,
}

impl Policy {
	pub fn new(exclude: &[PublishRule], candidates: &[PublishRule]) -> crate::Result<Self> {
		Ok(Self {
			exclude: exclude.iter().map(Rule::compile).collect::<crate::Result<_>>()?,
			candidates: candidates.iter().map(Rule::compile).collect::<crate::Result<_>>()?,
		})
	}

	pub fn from_config(config: &Config) -> crate::Result<Self> {
		Self::new(config.exclude(), config.candidates())
	}

	/// Units matching an exclude rule are treated as if they did not exist.
	pub fn is_excluded(&self, id: &str, maven: Option<&MavenCoordinates>) -> bool {
		self.exclude.iter().any(|r| r.is_match(id, maven))
	}

	/// Units matching a candidate rule are published even when they are available externally.
	pub fn is_candidate(&self, id: &str, maven: Option<&MavenCoordinates>) -> bool {
		self.candidates.iter().any(|r| r.is_match(id, maven))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn policy_matches_exact_id() {
		let policy = Policy::new(&[PublishRule::from_id("org.eclipse.birt.core")], &[]).unwrap();
		assert!(policy.is_excluded("org.eclipse.birt.core", Some(&MavenCoordinates::new("x", "y", "z"))));
		assert!(!policy.is_excluded("org.eclipse.birt.core.source", None));
		assert!(!policy.is_candidate("org.eclipse.birt.core", None));
	}

	#[test]
	fn policy_pattern_uses_coordinates() {
		let policy = Policy::new(&[], &[PublishRule::from_pattern(r"org\.eclipse\.birt:.*")]).unwrap();
		let maven = MavenCoordinates::new("org.eclipse.birt", "birt-core", "4.16.0");
		assert!(policy.is_candidate("org.eclipse.birt.core", Some(&maven)));
		/* With coordinates the id is not tried */
		let other = MavenCoordinates::new("org.slf4j", "slf4j-api", "1.7.36");
		assert!(!policy.is_candidate("org.eclipse.birt:core", Some(&other)));
	}

	#[test]
	fn policy_pattern_falls_back_to_id() {
		let policy = Policy::new(&[PublishRule::from_pattern(r"javax\..*")], &[]).unwrap();
		assert!(policy.is_excluded("javax.servlet", None));
		assert!(!policy.is_excluded("org.javax.servlet", None));
	}

	#[test]
	fn policy_pattern_must_match_whole_subject() {
		let policy = Policy::new(&[PublishRule::from_pattern(r"org\.slf4j")], &[]).unwrap();
		assert!(!policy.is_excluded("org.slf4j.api", None));
	}
}
