//! Engine configuration.

/// Configuration for a [`NavigationController`](crate::NavigationController).
///
/// Applications mounted under a URL prefix set `origin_path`; the
/// engine's logical URLs exclude the prefix, and history entries are
/// written with it prepended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterConfig {
	/// URL prefix the application is mounted under, e.g. `"/app"`.
	/// Empty when mounted at the domain root.
	pub origin_path: String,
	/// Maximum number of entries kept per visited-log namespace.
	pub visited_cap: usize,
	/// Prefix for the persisted visited-list keys.
	pub storage_prefix: String,
}

impl Default for RouterConfig {
	fn default() -> Self {
		Self {
			origin_path: String::new(),
			visited_cap: 100,
			storage_prefix: "veer".to_string(),
		}
	}
}

impl RouterConfig {
	/// Returns the key for the visited-URL namespace.
	pub(crate) fn visited_urls_key(&self) -> String {
		format!("{}.visited-urls", self.storage_prefix)
	}

	/// Returns the key for the visited-route-pattern namespace.
	pub(crate) fn visited_routes_key(&self) -> String {
		format!("{}.visited-routes", self.storage_prefix)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config() {
		let config = RouterConfig::default();
		assert_eq!(config.origin_path, "");
		assert_eq!(config.visited_cap, 100);
		assert_eq!(config.visited_urls_key(), "veer.visited-urls");
		assert_eq!(config.visited_routes_key(), "veer.visited-routes");
	}
}
