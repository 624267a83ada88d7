//! Derives maven coordinates for units from an ordered list of [`MappingRule`]s.

use regex::{Captures, Regex};

use crate::config::MappingRule;
use crate::metadb::*;

#[derive(Debug, Clone)]
struct Mapping {
	pattern: Regex,
	group_id: Option<String>,
	artifact_id: Option<String>,
	version: Option<String>,
}

/// Compiled mapping rules.
///
/// Rules are applied in order and every matching rule overwrites the fields it has a template for,
/// so for each field the last matching rule wins.
#[derive(Debug, Clone)]
pub struct CoordinateMapper {
	mappings: Vec<Mapping>,
}

impl CoordinateMapper {
	/// # Errors
	/// - [`Regex`](crate::Error::Regex) when a rule pattern is invalid.
	pub fn new(rules: &[MappingRule]) -> crate::Result<Self> {
		let mappings = rules.iter()
			.map(|rule| -> crate::Result<Mapping> {
				let pattern = full_match_regex(&rule.pattern)?;
				let groups = pattern.captures_len() - 1;
				let template = |t: &Option<String>| t.as_deref().map(|t| normalize_template(t, groups));
				Ok(Mapping {
					group_id: template(&rule.group_id),
					artifact_id: template(&rule.artifact_id),
					version: template(&rule.version),
					pattern,
				})
			})
			.collect::<crate::Result<Vec<_>>>()?;

		Ok(Self { mappings })
	}

	/// Derives the coordinates of a unit.
	///
	/// # Parameters
	/// - `hint` - Coordinates the unit or its artifact declares, used as the starting point and as the match subject.
	/// - `id` - The unit id, matched against when there is no hint.
	/// - `version` - The unit version, used when there is no hint.
	///
	/// # Returns
	/// `None` when no group could be determined.
	pub fn derive_coordinates(&self, hint: Option<&MavenCoordinates>, id: &str, version: &str) -> Option<MavenCoordinates> {
		let (mut maven, subject) = match hint {
			Some(hint) => (hint.clone(), hint.to_string()),
			None => (MavenCoordinates { version: Some(version.to_string()), ..Default::default() }, id.to_string()),
		};

		for mapping in &self.mappings {
			let Some(caps) = mapping.pattern.captures(&subject) else { continue };
			if let Some(t) = &mapping.group_id {
				maven.group_id = Some(expand(&caps, t));
			}
			if let Some(t) = &mapping.artifact_id {
				maven.artifact_id = Some(expand(&caps, t));
			}
			if let Some(t) = &mapping.version {
				maven.version = Some(expand(&caps, t));
			}
		}

		maven.group_id.is_some().then_some(maven)
	}
}

/// Rewrites numbered references `$N` as `${N}`, leaving `${name}` and `$$` alone.
///
/// The first digit always belongs to the reference, later digits only while the number still names
/// one of the `groups` capture groups. With one group `$12` is group 1 followed by a literal `2`.
fn normalize_template(template: &str, groups: usize) -> String {
	let mut out = String::with_capacity(template.len());
	let mut chars = template.chars().peekable();
	while let Some(c) = chars.next() {
		if c != '$' {
			out.push(c);
			continue;
		}
		match chars.peek().copied() {
			Some('$') => {
				chars.next();
				out.push_str("$$");
			},
			Some(d) if d.is_ascii_digit() => {
				let mut group = 0usize;
				let mut first = true;
				while let Some(d) = chars.peek().and_then(|d| d.to_digit(10)) {
					let next = group * 10 + d as usize;
					if !first && next > groups {
						break;
					}
					group = next;
					first = false;
					chars.next();
				}
				out.push_str(&format!("${{{}}}", group));
			},
			_ => out.push('$'),
		}
	}
	out
}

fn expand(caps: &Captures, template: &str) -> String {
	let mut out = String::new();
	caps.expand(template, &mut out);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule(pattern: &str, group: Option<&str>, artifact: Option<&str>, version: Option<&str>) -> MappingRule {
		MappingRule {
			pattern: pattern.to_string(),
			group_id: group.map(str::to_string),
			artifact_id: artifact.map(str::to_string),
			version: version.map(str::to_string),
		}
	}

	#[test]
	fn mapper_rewrites_hint_coordinates() {
		let mapper = CoordinateMapper::new(&[rule(r"com\.example:(.+):(.+)", None, Some("$1"), Some("$2"))]).unwrap();
		let hint = MavenCoordinates::new("com.example", "core", "1.0.0");
		let maven = mapper.derive_coordinates(Some(&hint), "com.example.core_1.0.0", "1.0.0").unwrap();
		assert_eq!(maven.to_string(), "com.example:core:1.0.0");
	}

	#[test]
	fn mapper_uses_id_without_hint() {
		let mapper = CoordinateMapper::new(&[rule(r"org\.eclipse\.birt\.(.+)", Some("org.eclipse.birt"), Some("birt-$1"), None)]).unwrap();
		let maven = mapper.derive_coordinates(None, "org.eclipse.birt.core", "4.16.0.v202406141054").unwrap();
		assert_eq!(maven.to_string(), "org.eclipse.birt:birt-core:4.16.0.v202406141054");
	}

	#[test]
	fn mapper_without_group_gives_none() {
		let mapper = CoordinateMapper::new(&[rule(r"org\.eclipse\.(.+)", None, Some("$1"), None)]).unwrap();
		assert!(mapper.derive_coordinates(None, "org.eclipse.core", "1.0").is_none());
		assert!(CoordinateMapper::new(&[]).unwrap().derive_coordinates(None, "org.eclipse.core", "1.0").is_none());
	}

	#[test]
	fn mapper_requires_whole_subject_match() {
		let mapper = CoordinateMapper::new(&[rule(r"org\.eclipse", Some("org.eclipse"), None, None)]).unwrap();
		assert!(mapper.derive_coordinates(None, "org.eclipse.core", "1.0").is_none());
	}

	#[test]
	fn mapper_last_match_wins_per_field() {
		let mapper = CoordinateMapper::new(&[
			rule(r"org\.eclipse\.(.+)", Some("org.eclipse"), Some("$1"), Some("1.0")),
			rule(r"org\.eclipse\.(emf)\.(.+)", Some("org.eclipse.emf"), None, None),
			rule(r"org\.nothing\.(.+)", Some("org.nothing"), None, None),
		]).unwrap();
		let maven = mapper.derive_coordinates(None, "org.eclipse.emf.ecore", "2.36.0").unwrap();
		assert_eq!(maven.group_id(), "org.eclipse.emf");
		assert_eq!(maven.artifact_id(), "emf.ecore");
		assert_eq!(maven.version(), "1.0");
	}

	#[test]
	fn mapper_numbered_reference_before_letters() {
		let mapper = CoordinateMapper::new(&[rule(r"org\.(\w+)", Some("org.$1group"), Some("${1}-api"), None)]).unwrap();
		let maven = mapper.derive_coordinates(None, "org.slf4j", "1.0").unwrap();
		assert_eq!(maven.group_id(), "org.slf4jgroup");
		assert_eq!(maven.artifact_id(), "slf4j-api");
	}

	#[test]
	fn mapper_numbered_reference_stops_at_last_group() {
		let mapper = CoordinateMapper::new(&[rule(r"org\.(\w+)", Some("g$12"), None, None)]).unwrap();
		let maven = mapper.derive_coordinates(None, "org.acme", "1.0").unwrap();
		assert_eq!(maven.group_id(), "gacme2");

		let many = (1..=12).map(|_| "(.)").collect::<String>();
		let mapper = CoordinateMapper::new(&[rule(&many, Some("$12$1"), None, None)]).unwrap();
		let maven = mapper.derive_coordinates(None, "abcdefghijkl", "1.0").unwrap();
		assert_eq!(maven.group_id(), "la");
	}

	#[test]
	fn template_normalization() {
		assert_eq!(normalize_template("$1-$2", 2), "${1}-${2}");
		assert_eq!(normalize_template("$$1 ${name}", 1), "$$1 ${name}");
		assert_eq!(normalize_template("a$", 0), "a$");
	}

	#[test]
	fn mapper_is_deterministic() {
		let mapper = CoordinateMapper::new(&[rule(r"(.+)\.(.+)", Some("$1"), Some("$2"), None)]).unwrap();
		let first = mapper.derive_coordinates(None, "a.b.c", "1");
		for _ in 0..10 {
			assert_eq!(mapper.derive_coordinates(None, "a.b.c", "1"), first);
		}
		assert_eq!(first.unwrap().to_string(), "a.b:c:1");
	}

	#[test]
	fn mapper_keeps_hint_extras() {
		let mapper = CoordinateMapper::new(&[]).unwrap();
		let mut hint = MavenCoordinates::new("g", "a", "1");
		hint.classifier = Some("linux".to_string());
		let maven = mapper.derive_coordinates(Some(&hint), "x", "2").unwrap();
		assert_eq!(maven.classifier.as_deref(), Some("linux"));
		assert_eq!(maven.version(), "1");
	}

	#[test]
	fn mapper_rejects_bad_pattern() {
		assert!(matches!(CoordinateMapper::new(&[rule("(", None, None, None)]), Err(crate::Error::Regex(_))));
	}
}
