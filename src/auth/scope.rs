//! OAuth scopes requested from ambient identity providers.

// self
use crate::_prelude::*;

/// Rejected scope entry.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ScopeValidationError {
	/// A scope entry was the empty string.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// A scope entry embedded whitespace, which would split it on the wire.
	#[error("Scope {scope:?} contains whitespace.")]
	ContainsWhitespace {
		/// The offending entry.
		scope: String,
	},
}

/// Sorted, duplicate-free scope list.
///
/// Each provider receives it joined with its own delimiter: commas for the metadata server,
/// spaces for OAuth token endpoints.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeSet(Arc<[String]>);
impl ScopeSet {
	/// Validates, sorts, and deduplicates `scopes`.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut scopes = scopes
			.into_iter()
			.map(|scope| check(scope.into()))
			.collect::<Result<Vec<_>, _>>()?;

		scopes.sort_unstable();
		scopes.dedup();

		Ok(Self(scopes.into()))
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether no scope was requested.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Scopes in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Scopes joined by `delimiter`; `None` for an empty set.
	pub fn join(&self, delimiter: &str) -> Option<String> {
		(!self.is_empty()).then(|| self.0.join(delimiter))
	}

	/// Underlying sorted slice.
	pub fn as_slice(&self) -> &[String] {
		&self.0
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_list().entries(self.iter()).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.join(" "))
	}
}

fn check(scope: String) -> Result<String, ScopeValidationError> {
	if scope.is_empty() {
		Err(ScopeValidationError::Empty)
	} else if scope.chars().any(char::is_whitespace) {
		Err(ScopeValidationError::ContainsWhitespace { scope })
	} else {
		Ok(scope)
	}
}
