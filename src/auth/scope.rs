//! Scope sets requested from the token endpoint, granted by tokeninfo, and required by
//! middleware.

// std
use std::collections::BTreeSet;
// self
use crate::_prelude::*;

/// Reasons a scope string is refused.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ScopeValidationError {
	/// Scope is the empty string.
	#[error("Scopes cannot be empty.")]
	Empty,
	/// Scope contains whitespace, which would split it on the wire.
	#[error("Scope `{scope}` contains whitespace.")]
	ContainsWhitespace {
		/// Offending scope.
		scope: String,
	},
}

/// Sorted, deduplicated scope set.
///
/// Serializes to the space-delimited OAuth form and deserializes from either that form or a
/// list of strings.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "WireScopes", into = "String")]
pub struct ScopeSet(BTreeSet<String>);
impl ScopeSet {
	/// Validates every entry and collects them into a set.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		scopes
			.into_iter()
			.map(|scope| {
				let scope: String = scope.into();

				validate_scope(&scope).map(|_| scope)
			})
			.collect::<Result<BTreeSet<_>, _>>()
			.map(Self)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when the set grants nothing.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true when `scope` is in the set.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.contains(scope)
	}

	/// Returns true when `granted` holds every scope of `self`.
	pub fn is_subset(&self, granted: &ScopeSet) -> bool {
		self.0.is_subset(&granted.0)
	}

	/// `self - granted`, sorted.
	pub fn missing_from<'a>(&'a self, granted: &'a ScopeSet) -> Vec<&'a str> {
		self.0.difference(&granted.0).map(String::as_str).collect()
	}

	/// Scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_set().entries(self.iter()).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		for (i, scope) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}

			f.write_str(scope)?;
		}

		Ok(())
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	/// Parses the space-delimited form; blank input is the empty set.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s.split_whitespace())
	}
}
impl From<ScopeSet> for String {
	fn from(scopes: ScopeSet) -> Self {
		scopes.to_string()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireScopes {
	Delimited(String),
	List(Vec<String>),
}
impl TryFrom<WireScopes> for ScopeSet {
	type Error = ScopeValidationError;

	fn try_from(wire: WireScopes) -> Result<Self, Self::Error> {
		match wire {
			WireScopes::Delimited(raw) => raw.parse(),
			WireScopes::List(scopes) => Self::new(scopes),
		}
	}
}

/// Checks one scope without adding it to a set.
pub fn validate_scope(scope: &str) -> Result<(), ScopeValidationError> {
	match scope {
		"" => Err(ScopeValidationError::Empty),
		s if s.contains(char::is_whitespace) =>
			Err(ScopeValidationError::ContainsWhitespace { scope: s.to_owned() }),
		_ => Ok(()),
	}
}
