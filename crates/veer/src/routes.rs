//! Route registration and URL resolution.
//!
//! The route table is the merged, de-duplicated set of routes from
//! every mounted route group, plus the designated not-found route. It
//! grows monotonically: routes are never removed, re-registering an
//! existing pattern is a no-op, and the not-found pattern is set by the
//! first registrant only.

use crate::error::RouterError;
use crate::pattern::PathPattern;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::warn;

/// Default not-found path used until a group designates one.
const DEFAULT_NOT_FOUND_PATH: &str = "/notfound";

/// Validates or rewrites matched path parameters.
///
/// Returns the concrete URL to navigate to, which must itself match the
/// owning pattern, or `None` to reject the match.
pub type RewriteFn = Rc<dyn Fn(&HashMap<String, String>) -> Option<String>>;

/// A route supplied by a route group at mount time.
#[derive(Clone)]
pub struct RouteSpec {
	pattern: String,
	not_found: bool,
	rewrite: Option<RewriteFn>,
	attributes: Vec<(String, String)>,
}

impl std::fmt::Debug for RouteSpec {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteSpec")
			.field("pattern", &self.pattern)
			.field("not_found", &self.not_found)
			.field("has_rewrite", &self.rewrite.is_some())
			.finish()
	}
}

impl RouteSpec {
	/// Creates a route for `pattern`.
	pub fn new(pattern: impl Into<String>) -> Self {
		Self {
			pattern: pattern.into(),
			not_found: false,
			rewrite: None,
			attributes: Vec::new(),
		}
	}

	/// Creates the designated not-found route.
	///
	/// The pattern must contain no parameter captures; violating this is
	/// a configuration error and the registration is discarded.
	pub fn not_found(pattern: impl Into<String>) -> Self {
		Self {
			not_found: true,
			..Self::new(pattern)
		}
	}

	/// Attaches a rewrite function validating/normalizing matched
	/// parameters.
	pub fn with_rewrite<F>(mut self, rewrite: F) -> Self
	where
		F: Fn(&HashMap<String, String>) -> Option<String> + 'static,
	{
		self.rewrite = Some(Rc::new(rewrite));
		self
	}

	/// Attaches a static pass-through attribute, handed to the view
	/// collaborator with every resolution of this route.
	pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	/// Returns the pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}
}

/// A registered route. Immutable once registered.
struct RouteDefinition {
	pattern: PathPattern,
	rewrite: Option<RewriteFn>,
	attributes: Vec<(String, String)>,
}

/// The result of resolving a URL.
///
/// This is the explicit parameter bag handed to the view-rendering
/// collaborator: matched parameters plus the route's pass-through
/// attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
	/// The matched pattern, or the not-found pattern.
	pub matched_pattern: String,
	/// The concrete URL to settle on (post-rewrite).
	pub final_url: String,
	/// Parameters extracted from `final_url`.
	pub params: HashMap<String, String>,
	/// The matched route's pass-through attributes.
	pub attributes: Vec<(String, String)>,
	/// Whether resolution fell through to the not-found route.
	pub not_found: bool,
}

/// The merged route table. Owned exclusively by the controller.
pub struct RouteTable {
	routes: Vec<RouteDefinition>,
	registered: HashMap<String, usize>,
	not_found_path: String,
	not_found_set: bool,
}

impl Default for RouteTable {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RouteTable")
			.field("routes_count", &self.routes.len())
			.field("not_found_path", &self.not_found_path)
			.finish()
	}
}

impl RouteTable {
	/// Creates an empty table with the default not-found path.
	pub fn new() -> Self {
		Self {
			routes: Vec::new(),
			registered: HashMap::new(),
			not_found_path: DEFAULT_NOT_FOUND_PATH.to_string(),
			not_found_set: false,
		}
	}

	/// Merges a group's routes into the table.
	///
	/// A pattern that is already registered is not replaced, so
	/// independently-mounted groups can register overlapping route
	/// lists idempotently. The first registered not-found route wins.
	///
	/// Misconfigured specs (invalid pattern, parameterized not-found)
	/// are discarded and returned; registration of the remaining specs
	/// proceeds.
	pub fn register(&mut self, specs: &[RouteSpec]) -> Vec<RouterError> {
		let mut errors = Vec::new();

		for spec in specs {
			let pattern = match PathPattern::new(&spec.pattern) {
				Ok(pattern) => pattern,
				Err(source) => {
					let err = RouterError::InvalidPattern {
						pattern: spec.pattern.clone(),
						source,
					};
					warn!(pattern = %spec.pattern, "discarding route: {err}");
					errors.push(err);
					continue;
				}
			};

			if spec.not_found {
				if pattern.has_params() {
					let err = RouterError::ParameterizedNotFound(spec.pattern.clone());
					warn!(pattern = %spec.pattern, "discarding not-found route: {err}");
					errors.push(err);
					continue;
				}
				if !self.not_found_set {
					self.not_found_set = true;
					self.not_found_path = spec.pattern.clone();
				}
				continue;
			}

			if self.registered.contains_key(&spec.pattern) {
				continue;
			}
			self.registered.insert(spec.pattern.clone(), self.routes.len());
			self.routes.push(RouteDefinition {
				pattern,
				rewrite: spec.rewrite.clone(),
				attributes: spec.attributes.clone(),
			});
		}

		errors
	}

	/// Returns the designated not-found path.
	pub fn not_found_path(&self) -> &str {
		&self.not_found_path
	}

	/// Returns whether a pattern has been registered.
	pub fn is_registered(&self, pattern: &str) -> bool {
		self.registered.contains_key(pattern)
	}

	/// Returns the number of registered routes (excluding not-found).
	pub fn len(&self) -> usize {
		self.routes.len()
	}

	/// Returns whether the table has no registered routes.
	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	/// Returns the pattern of the last-registered route matching `url`,
	/// if any.
	pub fn matching_pattern(&self, url: &str) -> Option<&str> {
		self.routes
			.iter()
			.rev()
			.find(|route| route.pattern.is_match(url))
			.map(|route| route.pattern.pattern())
	}

	/// Generates a URL for a registered pattern from a parameter map.
	///
	/// # Errors
	///
	/// [`RouterError::UnknownPattern`] when the pattern is not
	/// registered, [`RouterError::MissingParameter`] when a capture has
	/// no corresponding parameter.
	pub fn reverse(
		&self,
		pattern: &str,
		params: &HashMap<String, String>,
	) -> Result<String, RouterError> {
		let index = self
			.registered
			.get(pattern)
			.ok_or_else(|| RouterError::UnknownPattern(pattern.to_string()))?;
		let definition = &self.routes[*index];

		definition.pattern.reverse(params).ok_or_else(|| {
			let missing = definition
				.pattern
				.param_names()
				.iter()
				.find(|name| !params.contains_key(*name))
				.cloned()
				.unwrap_or_default();
			RouterError::MissingParameter(missing)
		})
	}

	/// Returns whether some single registered pattern matches both URLs,
	/// i.e. the two point at the same route.
	pub fn matches_same_route(&self, a: &str, b: &str) -> bool {
		self.routes
			.iter()
			.any(|route| route.pattern.is_match(a) && route.pattern.is_match(b))
	}

	/// Resolves a URL against the table. Total: unmatched input yields
	/// the not-found route, never "no result".
	///
	/// When several patterns structurally match, the last-registered
	/// definition that also survives its rewrite wins. A rewrite whose
	/// output does not re-match its own pattern rejects that route.
	pub fn resolve(&self, url: &str) -> Resolution {
		let clean = strip_query_and_fragment(url);

		let mut matched: Option<Resolution> = None;
		for route in &self.routes {
			if !route.pattern.is_match(&clean) {
				continue;
			}
			let params = route.pattern.extract(&clean);

			let final_url = match &route.rewrite {
				None => clean.clone(),
				Some(rewrite) => match rewrite(&params) {
					Some(rewritten) if route.pattern.is_match(&rewritten) => rewritten,
					Some(rewritten) => {
						warn!(
							pattern = %route.pattern,
							rewritten = %rewritten,
							"rewrite output does not match its own pattern; rejecting"
						);
						continue;
					}
					None => continue,
				},
			};

			let params = route.pattern.extract(&final_url);
			matched = Some(Resolution {
				matched_pattern: route.pattern.pattern().to_string(),
				final_url,
				params,
				attributes: route.attributes.clone(),
				not_found: false,
			});
		}

		matched.unwrap_or_else(|| Resolution {
			matched_pattern: self.not_found_path.clone(),
			final_url: self.not_found_path.clone(),
			params: HashMap::new(),
			attributes: Vec::new(),
			not_found: true,
		})
	}
}

/// Strips the querystring and fragment from a URL.
pub fn strip_query_and_fragment(url: &str) -> String {
	let end = url
		.find(['?', '#'])
		.unwrap_or(url.len());
	url[..end].to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn table_with(specs: &[RouteSpec]) -> RouteTable {
		let mut table = RouteTable::new();
		assert!(table.register(specs).is_empty());
		table
	}

	#[test]
	fn test_register_and_resolve() {
		let table = table_with(&[RouteSpec::new("/"), RouteSpec::new("/users/{id}/")]);

		let resolution = table.resolve("/users/42/");
		assert!(!resolution.not_found);
		assert_eq!(resolution.matched_pattern, "/users/{id}/");
		assert_eq!(resolution.final_url, "/users/42/");
		assert_eq!(resolution.params.get("id"), Some(&"42".to_string()));
	}

	#[test]
	fn test_resolution_is_total() {
		let table = table_with(&[RouteSpec::new("/")]);

		let resolution = table.resolve("/nowhere");
		assert!(resolution.not_found);
		assert_eq!(resolution.final_url, "/notfound");
		assert_eq!(resolution.matched_pattern, "/notfound");
	}

	#[test]
	fn test_not_found_route_designation() {
		let table = table_with(&[RouteSpec::new("/"), RouteSpec::not_found("/missing")]);

		assert_eq!(table.not_found_path(), "/missing");
		assert_eq!(table.resolve("/nowhere").final_url, "/missing");
	}

	#[test]
	fn test_first_not_found_wins() {
		let mut table = RouteTable::new();
		table.register(&[RouteSpec::not_found("/first")]);
		table.register(&[RouteSpec::not_found("/second")]);

		assert_eq!(table.not_found_path(), "/first");
	}

	#[test]
	fn test_parameterized_not_found_is_discarded() {
		let mut table = RouteTable::new();
		let errors = table.register(&[RouteSpec::not_found("/missing/{id}")]);

		assert_eq!(
			errors,
			vec![RouterError::ParameterizedNotFound("/missing/{id}".to_string())]
		);
		assert_eq!(table.not_found_path(), "/notfound");
	}

	#[test]
	fn test_registration_is_idempotent() {
		let mut table = RouteTable::new();
		table.register(&[RouteSpec::new("/users/{id}/")]);
		// Second registration carries a rewrite; it must be ignored
		table.register(&[
			RouteSpec::new("/users/{id}/").with_rewrite(|_| Some("/users/0/".to_string())),
		]);

		assert_eq!(table.len(), 1);
		assert_eq!(table.resolve("/users/42/").final_url, "/users/42/");
	}

	#[test]
	fn test_rewrite_normalizes_params() {
		let table = table_with(&[RouteSpec::new("/color/{r}/{g}/{b}").with_rewrite(|params| {
			let clamp = |name: &str, params: &HashMap<String, String>| {
				params
					.get(name)
					.and_then(|v| v.parse::<i64>().ok())
					.map(|v| v.abs().min(255))
			};
			Some(format!(
				"/color/{}/{}/{}",
				clamp("r", params)?,
				clamp("g", params)?,
				clamp("b", params)?
			))
		})]);

		let resolution = table.resolve("/color/300/10/-5");
		assert!(!resolution.not_found);
		assert_eq!(resolution.final_url, "/color/255/10/5");
		assert_eq!(resolution.params.get("b"), Some(&"5".to_string()));
	}

	#[test]
	fn test_rewrite_rejection_falls_back_to_not_found() {
		let table = table_with(&[
			RouteSpec::new("/users/{id}/").with_rewrite(|_| Some("/elsewhere".to_string())),
		]);

		// Output does not re-match the owning pattern
		assert!(table.resolve("/users/42/").not_found);
	}

	#[test]
	fn test_rewrite_none_rejects_match() {
		let table = table_with(&[RouteSpec::new("/users/{id}/").with_rewrite(|params| {
			params.get("id")?.parse::<u64>().ok()?;
			Some(format!("/users/{}/", params.get("id")?))
		})]);

		assert!(!table.resolve("/users/42/").not_found);
		assert!(table.resolve("/users/abc/").not_found);
	}

	#[test]
	fn test_overlap_last_registered_wins() {
		let table = table_with(&[RouteSpec::new("/items/{id}"), RouteSpec::new("/items/special")]);

		let resolution = table.resolve("/items/special");
		assert_eq!(resolution.matched_pattern, "/items/special");

		let resolution = table.resolve("/items/42");
		assert_eq!(resolution.matched_pattern, "/items/{id}");
	}

	#[test]
	fn test_pass_through_attributes() {
		let table = table_with(&[
			RouteSpec::new("/about").with_attr("title", "About").with_attr("theme", "dark"),
		]);

		let resolution = table.resolve("/about");
		assert_eq!(
			resolution.attributes,
			vec![
				("title".to_string(), "About".to_string()),
				("theme".to_string(), "dark".to_string())
			]
		);
	}

	#[rstest]
	#[case("/a?x=1", "/a")]
	#[case("/a#top", "/a")]
	#[case("/a?x=1#top", "/a")]
	#[case("/a", "/a")]
	fn test_strip_query_and_fragment(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(strip_query_and_fragment(input), expected);
	}

	#[test]
	fn test_resolve_strips_query_and_fragment() {
		let table = table_with(&[RouteSpec::new("/users/{id}/")]);
		assert_eq!(table.resolve("/users/42/?tab=posts").final_url, "/users/42/");
	}

	#[test]
	fn test_reverse_url() {
		let table = table_with(&[RouteSpec::new("/users/{id}/")]);

		let mut params = HashMap::new();
		params.insert("id".to_string(), "42".to_string());
		assert_eq!(
			table.reverse("/users/{id}/", &params),
			Ok("/users/42/".to_string())
		);

		assert_eq!(
			table.reverse("/users/{id}/", &HashMap::new()),
			Err(RouterError::MissingParameter("id".to_string()))
		);
		assert_eq!(
			table.reverse("/posts/{id}/", &params),
			Err(RouterError::UnknownPattern("/posts/{id}/".to_string()))
		);
	}

	#[test]
	fn test_invalid_pattern_reported_and_skipped() {
		let mut table = RouteTable::new();
		let long = "/".to_string() + &"a".repeat(2000);
		let errors = table.register(&[RouteSpec::new(long), RouteSpec::new("/ok")]);

		assert_eq!(errors.len(), 1);
		assert!(matches!(errors[0], RouterError::InvalidPattern { .. }));
		assert!(table.is_registered("/ok"));
	}
}
