//! Browser history abstraction.
//!
//! The engine never touches the History API directly; it talks to a
//! [`HistorySync`] collaborator injected at construction time. The
//! browser-backed implementation lives in `veer-dom`; tests use
//! [`MemoryHistory`](crate::testing::MemoryHistory).

/// A history entry written by the engine.
///
/// `url` is the logical (origin-stripped) URL stored in the entry's
/// state and handed back on popstate; `display_url` is what the address
/// bar shows; `seq` is the navigation sequence number at push time,
/// compared against the current sequence to infer back/forward
/// direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	/// Logical URL, excluding the origin path.
	pub url: String,
	/// Full URL written to the address bar, including the origin path.
	pub display_url: String,
	/// Navigation sequence number stored with the entry.
	pub seq: i64,
}

/// External location source and history sink.
///
/// Back/forward and hash-change events are delivered separately, by
/// calling [`NavigationController::handle_pop_state`] and
/// [`NavigationController::handle_hash_change`] from whatever event
/// loop owns the implementation.
///
/// [`NavigationController::handle_pop_state`]: crate::NavigationController::handle_pop_state
/// [`NavigationController::handle_hash_change`]: crate::NavigationController::handle_hash_change
pub trait HistorySync {
	/// Reads the current external location as path + query + fragment,
	/// including the origin path.
	fn current_url(&self) -> String;

	/// Pushes a new history entry.
	fn push(&self, entry: &HistoryEntry);

	/// Replaces the current history entry.
	fn replace(&self, entry: &HistoryEntry);
}

/// Derives the logical current URL from an external location string by
/// stripping the configured origin path.
///
/// An empty result (the location was exactly the origin path, possibly
/// with a dangling `#`) maps to `"/"`.
pub fn parse_current_url(location: &str, origin_path: &str) -> String {
	let mut url = if origin_path.is_empty() {
		location.to_string()
	} else {
		location.replacen(origin_path, "", 1)
	};

	if url == "#" {
		url.clear();
	}
	if url.is_empty() {
		return "/".to_string();
	}
	if !url.starts_with('/') {
		url.insert(0, '/');
	}
	url
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_without_origin() {
		assert_eq!(parse_current_url("/users/42/", ""), "/users/42/");
	}

	#[test]
	fn test_parse_strips_origin() {
		assert_eq!(parse_current_url("/app/users/42/", "/app"), "/users/42/");
	}

	#[test]
	fn test_parse_origin_root_maps_to_slash() {
		assert_eq!(parse_current_url("/app", "/app"), "/");
		assert_eq!(parse_current_url("/app#", "/app"), "/");
	}

	#[test]
	fn test_parse_keeps_query_and_fragment() {
		// Query/fragment stripping happens at resolve time, not here
		assert_eq!(parse_current_url("/a?x=1#top", ""), "/a?x=1#top");
	}
}
