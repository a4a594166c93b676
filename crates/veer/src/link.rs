//! Link state and attribute building.
//!
//! A [`Link`] describes a navigation anchor: it computes whether its
//! destination is the active location and whether it has been visited,
//! and emits those as data attributes for styling. Clicking is modelled
//! by [`Link::activate`], which routes through the controller as a
//! user-link navigation.

use crate::controller::{NavigateOptions, NavigationController};

/// Computed state of a link against the controller's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkState {
	/// The link points at the active location.
	pub current: bool,
	/// The link's destination has been visited.
	pub visited: bool,
}

/// A navigation link.
#[derive(Debug, Clone)]
pub struct Link {
	href: String,
	fuzzy_current: bool,
	fuzzy_visited: bool,
	disabled: bool,
	attrs: Vec<(String, String)>,
}

impl Link {
	/// Creates a link to `href` (a logical URL, excluding the origin
	/// path).
	pub fn new(href: impl Into<String>) -> Self {
		Self {
			href: href.into(),
			fuzzy_current: false,
			fuzzy_visited: false,
			disabled: false,
			attrs: Vec::new(),
		}
	}

	/// Treats the link as current when its destination and the active
	/// location match the same route, rather than requiring URL
	/// equality.
	pub fn fuzzy_current(mut self, fuzzy: bool) -> Self {
		self.fuzzy_current = fuzzy;
		self
	}

	/// Treats the link as visited when any visited route pattern
	/// matches its destination, rather than requiring an exact visited
	/// URL.
	pub fn fuzzy_visited(mut self, fuzzy: bool) -> Self {
		self.fuzzy_visited = fuzzy;
		self
	}

	/// Disables activation.
	pub fn disabled(mut self, disabled: bool) -> Self {
		self.disabled = disabled;
		self
	}

	/// Adds a custom attribute.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.push((name.into(), value.into()));
		self
	}

	/// Returns the destination.
	pub fn href(&self) -> &str {
		&self.href
	}

	/// Computes the link's state against the controller.
	pub fn state(&self, controller: &NavigationController) -> LinkState {
		let current = if self.fuzzy_current {
			controller.is_current_fuzzy(&self.href)
		} else {
			controller.is_current(&self.href)
		};
		let visited = if self.fuzzy_visited {
			controller.is_visited_fuzzy(&self.href)
		} else {
			controller.is_visited(&self.href)
		};
		LinkState { current, visited }
	}

	/// Activates the link: navigates as a user link unless the link is
	/// disabled or already current. Returns whether a navigation was
	/// issued.
	pub fn activate(&self, controller: &NavigationController) -> bool {
		if self.disabled || self.state(controller).current {
			return false;
		}
		controller.navigate(&self.href, NavigateOptions::user_link());
		true
	}

	/// Renders the anchor attributes: `href` (with the origin path, via
	/// the caller), current/visited data attributes, and any custom
	/// attributes.
	pub fn attributes(&self, controller: &NavigationController) -> Vec<(String, String)> {
		let state = self.state(controller);
		let mut attrs = vec![
			("href".to_string(), self.href.clone()),
			(
				"data-veer-current-link".to_string(),
				state.current.to_string(),
			),
			(
				"data-veer-visited-link".to_string(),
				state.visited.to_string(),
			),
		];
		attrs.extend(self.attrs.iter().cloned());
		attrs
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::RouterConfig;
	use crate::group::TransitionSpec;
	use crate::routes::RouteSpec;
	use crate::testing::{ManualScheduler, MemoryHistory, MemoryListStore};
	use std::rc::Rc;

	fn controller_at(location: &str) -> NavigationController {
		let controller = NavigationController::new(
			Rc::new(MemoryHistory::at(location)),
			Rc::new(MemoryListStore::default()),
			Rc::new(ManualScheduler::new()),
			RouterConfig::default(),
		);
		controller.register_group(
			&[
				RouteSpec::new("/"),
				RouteSpec::new("/users/{id}/"),
				RouteSpec::new("/about"),
			],
			TransitionSpec::default(),
		);
		controller.bootstrap();
		controller
	}

	#[test]
	fn test_current_link() {
		let controller = controller_at("/about");
		assert!(Link::new("/about").state(&controller).current);
		assert!(!Link::new("/").state(&controller).current);
	}

	#[test]
	fn test_fuzzy_current_link() {
		let controller = controller_at("/users/1/");
		let link = Link::new("/users/2/").fuzzy_current(true);
		assert!(link.state(&controller).current);
	}

	#[test]
	fn test_visited_after_leaving() {
		let controller = controller_at("/about");

		// Leaving /about via a user link records it as visited
		Link::new("/").activate(&controller);
		assert!(Link::new("/about").state(&controller).visited);
		assert!(!Link::new("/users/1/").state(&controller).visited);
	}

	#[test]
	fn test_fuzzy_visited_matches_route_pattern() {
		let controller = controller_at("/users/1/");
		Link::new("/").activate(&controller);

		let link = Link::new("/users/42/").fuzzy_visited(true);
		assert!(link.state(&controller).visited);
		assert!(!Link::new("/users/42/").state(&controller).visited);
	}

	#[test]
	fn test_activate_skips_current_and_disabled() {
		let controller = controller_at("/about");
		assert!(!Link::new("/about").activate(&controller));
		assert!(!Link::new("/").disabled(true).activate(&controller));
		assert_eq!(controller.current_url(), "/about");
	}

	#[test]
	fn test_attributes() {
		let controller = controller_at("/about");
		let attrs = Link::new("/about").attr("class", "nav").attributes(&controller);

		assert!(attrs.contains(&("href".to_string(), "/about".to_string())));
		assert!(attrs.contains(&("data-veer-current-link".to_string(), "true".to_string())));
		assert!(attrs.contains(&("data-veer-visited-link".to_string(), "false".to_string())));
		assert!(attrs.contains(&("class".to_string(), "nav".to_string())));
	}
}
