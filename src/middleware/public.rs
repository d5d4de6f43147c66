//! Public path patterns that bypass bearer validation.

// self
use crate::{_prelude::*, error::ConfigError};

#[derive(Clone, Debug, PartialEq, Eq)]
enum PathPattern {
	/// Matches the path itself and everything below it (`/health` matches `/health/live`).
	Path(String),
	/// Written with a trailing `*`; matches any path starting with the text before it.
	Prefix(String),
}
impl PathPattern {
	fn parse(raw: &str) -> Result<Self, ConfigError> {
		if !raw.starts_with('/') {
			return Err(ConfigError::InvalidPublicEndpoint { pattern: raw.to_owned() });
		}

		Ok(match raw.strip_suffix('*') {
			Some(prefix) => Self::Prefix(prefix.to_owned()),
			None => Self::Path(raw.to_owned()),
		})
	}

	fn matches(&self, path: &str) -> bool {
		match self {
			Self::Prefix(prefix) => path.starts_with(prefix.as_str()),
			Self::Path(pattern) => match path.strip_prefix(pattern.as_str()) {
				Some(rest) => rest.is_empty() || pattern.ends_with('/') || rest.starts_with('/'),
				None => false,
			},
		}
	}
}

/// Ordered list of path patterns whose requests skip validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicEndpoints {
	patterns: Vec<PathPattern>,
}
impl PublicEndpoints {
	/// Parses `patterns`; each must start with `/`.
	pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let patterns = patterns
			.into_iter()
			.map(|raw| PathPattern::parse(raw.as_ref()))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self { patterns })
	}

	/// Returns true when any pattern matches `path`.
	pub fn matches(&self, path: &str) -> bool {
		self.patterns.iter().any(|pattern| pattern.matches(path))
	}

	/// Number of patterns.
	pub fn len(&self) -> usize {
		self.patterns.len()
	}

	/// Returns true when no path is public.
	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn plain_patterns_respect_segment_boundaries() {
		let public =
			PublicEndpoints::new(["/health", "/docs/"]).expect("Patterns should be valid.");

		assert!(public.matches("/health"));
		assert!(public.matches("/health/live"));
		assert!(!public.matches("/healthz"));
		assert!(public.matches("/docs/index.html"));
		assert!(!public.matches("/orders"));
	}

	#[test]
	fn wildcard_patterns_match_raw_prefixes() {
		let public = PublicEndpoints::new(["/static*"]).expect("Pattern should be valid.");

		assert!(public.matches("/static"));
		assert!(public.matches("/static-v2/app.js"));
		assert!(!public.matches("/api/static"));
	}

	#[test]
	fn invalid_patterns_are_rejected() {
		assert!(matches!(
			PublicEndpoints::new(["health"]),
			Err(ConfigError::InvalidPublicEndpoint { .. })
		));
		assert!(PublicEndpoints::new([""]).is_err());
		assert!(PublicEndpoints::new(Vec::<String>::new()).expect("Empty is valid.").is_empty());
	}
}
