//! Helpers for p2 property bags.

use std::collections::HashMap;

pub const NAME_PROPERTY: &str = "org.eclipse.equinox.p2.name";
pub const DESCRIPTION_PROPERTY: &str = "org.eclipse.equinox.p2.description";

/// Gets the first non blank value of `key` or one of `fallbacks`.
pub fn get_property<'a>(properties: &'a HashMap<String, String>, key: &str, fallbacks: &[&str]) -> Option<&'a str> {
	std::iter::once(key)
		.chain(fallbacks.iter().copied())
		.filter_map(|k| properties.get(k))
		.map(String::as_str)
		.find(|v| !v.trim().is_empty())
}

/// Replaces `%key` values with the value of `df_LT.key` when the bag has one.
///
/// Values without a default localization are left as they are.
pub fn localize(properties: &mut HashMap<String, String>) {
	let resolved: Vec<(String, String)> = properties.iter()
		.filter_map(|(key, value)| {
			let localized = properties.get(&format!("df_LT.{}", value.strip_prefix('%')?))?;
			Some((key.clone(), localized.clone()))
		})
		.collect();

	for (key, value) in resolved {
		properties.insert(key, value);
	}
}
