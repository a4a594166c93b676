//! Error types for the navigation engine.
//!
//! Navigation itself never fails: unmatched URLs resolve to the
//! not-found route, and interrupted transitions still settle. The
//! errors here cover registration-time misconfiguration and reverse
//! URL generation.

use thiserror::Error;

/// Error raised while compiling a route pattern.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatternError {
	/// Pattern exceeds the maximum allowed length.
	#[error("pattern length {len} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual pattern length in bytes.
		len: usize,
		/// Maximum allowed length.
		max: usize,
	},
	/// Pattern has too many path segments.
	#[error("pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Maximum allowed segment count.
		max: usize,
	},
	/// The compiled regex was rejected.
	#[error("failed to compile pattern regex: {0}")]
	Regex(String),
}

/// Error type for router operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouterError {
	/// A route pattern failed to compile; the registration is discarded.
	#[error("invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		/// The offending pattern string.
		pattern: String,
		/// The underlying compile failure.
		source: PatternError,
	},
	/// A not-found route was declared with parameter captures; the
	/// registration is discarded.
	#[error("not-found route pattern '{0}' must not contain parameter captures")]
	ParameterizedNotFound(String),
	/// A parameter required to reverse a pattern into a URL was missing.
	#[error("missing parameter '{0}' for reverse URL")]
	MissingParameter(String),
	/// A reverse lookup referenced a pattern that is not registered.
	#[error("no route registered with pattern '{0}'")]
	UnknownPattern(String),
	/// An operation referenced a route group that is not mounted.
	#[error("no route group registered with id {0}")]
	UnknownGroup(u64),
}
