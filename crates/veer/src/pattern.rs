//! Path pattern compilation and matching.
//!
//! Patterns are plain paths whose segments are either literal text or a
//! `{name}` capture:
//!
//! - `/users/` matches exactly
//! - `/users/{id}/` captures one segment
//! - `/color/{r}/{g}/{b}` captures several
//!
//! Matching is purely structural: a URL matches when it has the same
//! segment shape and equal literal segments. Captured values are
//! extracted as strings with no semantic validation; callers strip the
//! querystring and fragment before matching.

use crate::error::PatternError;
use std::collections::HashMap;

/// Maximum allowed length for a pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex in bytes.
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// A compiled path pattern with named-parameter extraction.
#[derive(Debug, Clone)]
pub struct PathPattern {
	/// The original pattern string.
	pattern: String,
	/// Compiled regex.
	regex: regex::Regex,
	/// Capture names in the order they appear in the pattern.
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern exceeds the length or
	/// segment limits, or compiles to an invalid regex.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				len: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}

		let segment_count = pattern.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: segment_count,
				max: MAX_PATH_SEGMENTS,
			});
		}

		let (regex_str, param_names) = Self::compile(pattern);

		let regex = regex::RegexBuilder::new(&regex_str)
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	/// Compiles the pattern into a regex string, segment by segment.
	///
	/// A segment of the form `{name}` becomes a named capture matching
	/// anything except `/`; every other segment is matched literally.
	fn compile(pattern: &str) -> (String, Vec<String>) {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();

		let mut first = true;
		for segment in pattern.split('/') {
			if !first {
				regex_str.push('/');
			}
			first = false;

			if let Some(name) = segment
				.strip_prefix('{')
				.and_then(|rest| rest.strip_suffix('}'))
			{
				regex_str.push_str(&format!("(?P<{}>[^/]+)", name));
				param_names.push(name.to_string());
			} else {
				regex_str.push_str(&regex::escape(segment));
			}
		}

		regex_str.push('$');
		(regex_str, param_names)
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the capture names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this pattern contains any captures.
	pub fn has_params(&self) -> bool {
		!self.param_names.is_empty()
	}

	/// Tests whether a URL matches this pattern.
	pub fn is_match(&self, url: &str) -> bool {
		self.regex.is_match(url)
	}

	/// Extracts named parameters from a matching URL.
	///
	/// Returns an empty map when the URL does not match; call
	/// [`is_match`](Self::is_match) first to distinguish a non-match
	/// from a parameterless match.
	pub fn extract(&self, url: &str) -> HashMap<String, String> {
		self.regex
			.captures(url)
			.map(|caps| {
				self.param_names
					.iter()
					.filter_map(|name| {
						caps.name(name)
							.map(|m| (name.clone(), m.as_str().to_string()))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Generates a URL from this pattern with the given parameters.
	///
	/// Returns `None` when a capture has no corresponding parameter.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Option<String> {
		let mut result = self.pattern.clone();

		for name in &self.param_names {
			let value = params.get(name)?;
			let placeholder = format!("{{{}}}", name);
			result = result.replace(&placeholder, value);
		}

		Some(result)
	}
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for PathPattern {}

impl std::fmt::Display for PathPattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_exact_pattern() {
		let pattern = PathPattern::new("/users/").unwrap();
		assert!(!pattern.has_params());
		assert!(pattern.is_match("/users/"));
		assert!(!pattern.is_match("/users/123/"));
		assert!(!pattern.is_match("/users"));
	}

	#[test]
	fn test_single_param() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		assert!(pattern.has_params());
		assert!(pattern.is_match("/users/42/"));
		assert!(pattern.is_match("/users/abc/"));
		assert!(!pattern.is_match("/users/"));

		let params = pattern.extract("/users/42/");
		assert_eq!(params.get("id"), Some(&"42".to_string()));
	}

	#[test]
	fn test_multiple_params() {
		let pattern = PathPattern::new("/color/{r}/{g}/{b}").unwrap();
		let params = pattern.extract("/color/255/10/5");

		assert_eq!(params.get("r"), Some(&"255".to_string()));
		assert_eq!(params.get("g"), Some(&"10".to_string()));
		assert_eq!(params.get("b"), Some(&"5".to_string()));
		assert_eq!(pattern.param_names(), &["r", "g", "b"]);
	}

	#[test]
	fn test_param_excludes_separator() {
		let pattern = PathPattern::new("/posts/{slug}").unwrap();
		assert!(pattern.is_match("/posts/hello-world"));
		assert!(!pattern.is_match("/posts/a/b"));
	}

	#[test]
	fn test_matching_is_structural_only() {
		// Captured values carry no semantic meaning at match time
		let pattern = PathPattern::new("/color/{r}/{g}/{b}").unwrap();
		assert!(pattern.is_match("/color/300/10/-5"));
	}

	#[test]
	fn test_special_chars_escaped() {
		let pattern = PathPattern::new("/api/v1.0/").unwrap();
		assert!(pattern.is_match("/api/v1.0/"));
		assert!(!pattern.is_match("/api/v1X0/"));
	}

	#[test]
	fn test_reverse() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		let mut params = HashMap::new();
		params.insert("id".to_string(), "42".to_string());

		assert_eq!(pattern.reverse(&params), Some("/users/42/".to_string()));
	}

	#[test]
	fn test_reverse_missing_param() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		assert_eq!(pattern.reverse(&HashMap::new()), None);
	}

	#[test]
	fn test_extract_non_matching_is_empty() {
		let pattern = PathPattern::new("/users/{id}/").unwrap();
		assert!(pattern.extract("/posts/1/").is_empty());
	}

	#[test]
	fn test_pattern_rejects_excessive_length() {
		let long_pattern = "/".to_string() + &"a".repeat(1025);
		assert!(matches!(
			PathPattern::new(&long_pattern),
			Err(PatternError::TooLong { .. })
		));
	}

	#[test]
	fn test_pattern_rejects_excessive_segments() {
		let segments: Vec<&str> = (0..35).map(|_| "seg").collect();
		let pattern = format!("/{}/", segments.join("/"));
		assert!(matches!(
			PathPattern::new(&pattern),
			Err(PatternError::TooManySegments { .. })
		));
	}

	#[test]
	fn test_pattern_display_and_equality() {
		let p1 = PathPattern::new("/users/{id}/").unwrap();
		let p2 = PathPattern::new("/users/{id}/").unwrap();
		let p3 = PathPattern::new("/users/{uid}/").unwrap();

		assert_eq!(format!("{}", p1), "/users/{id}/");
		assert_eq!(p1, p2);
		assert_ne!(p1, p3);
	}
}
