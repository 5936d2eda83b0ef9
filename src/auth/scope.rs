//! Requested-scope lists and the provider's indexed query-string encoding.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError, ser::SerializeSeq};
// self
use crate::_prelude::*;

/// Errors emitted when validating scopes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// Empty scope entries are not allowed.
	#[error("Scope entries cannot be empty.")]
	Empty,
	/// Scopes cannot contain embedded whitespace characters.
	#[error("Scope contains whitespace: {scope}.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Deduplicated scope list that keeps the order scopes were first added in.
///
/// The provider reads scopes as `scopes[<index>]` query parameters, so the insertion order
/// decides the index each scope is sent under.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ScopeList {
	scopes: Vec<String>,
}
impl ScopeList {
	/// Creates a scope list from any iterator, dropping later duplicates.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut list = Self::default();

		for scope in scopes {
			list.insert(scope)?;
		}

		Ok(list)
	}

	/// Appends a scope unless it is already present; returns whether it was added.
	pub fn insert(&mut self, scope: impl Into<String>) -> Result<bool, ScopeValidationError> {
		let owned = validate(scope.into())?;

		if self.contains(&owned) {
			return Ok(false);
		}

		self.scopes.push(owned);

		Ok(true)
	}

	/// Number of distinct scopes.
	pub fn len(&self) -> usize {
		self.scopes.len()
	}

	/// Returns true if no scopes are defined.
	pub fn is_empty(&self) -> bool {
		self.scopes.is_empty()
	}

	/// Returns true if the list contains the provided scope.
	pub fn contains(&self, scope: &str) -> bool {
		self.scopes.iter().any(|candidate| candidate == scope)
	}

	/// Iterator over scopes in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.scopes.iter().map(|s| s.as_str())
	}

	/// Returns the underlying slice of scope strings.
	pub fn as_slice(&self) -> &[String] {
		&self.scopes
	}

	/// Encodes the list as `scopes[0]=<a>&scopes[1]=<b>…`.
	///
	/// Values are percent-encoded so only RFC 3986 unreserved characters pass through. An
	/// empty list encodes to an empty string.
	pub fn to_query(&self) -> String {
		encode_scopes(self.iter())
	}
}
impl Debug for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeList").field(&self.scopes).finish()
	}
}
impl Display for ScopeList {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.scopes.join(" "))
	}
}
impl TryFrom<Vec<String>> for ScopeList {
	type Error = ScopeValidationError;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl FromStr for ScopeList {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeList {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let mut seq = serializer.serialize_seq(Some(self.scopes.len()))?;

		for scope in &self.scopes {
			seq.serialize_element(scope)?;
		}

		seq.end()
	}
}
impl<'de> Deserialize<'de> for ScopeList {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let values = <Vec<String>>::deserialize(deserializer)?;

		ScopeList::new(values).map_err(DeError::custom)
	}
}

/// Encodes scopes in enumeration order as indexed `scopes[n]` query parameters.
pub fn encode_scopes<'a, I>(scopes: I) -> String
where
	I: IntoIterator<Item = &'a str>,
{
	let mut buf = String::new();

	for (idx, scope) in scopes.into_iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(&format!("scopes[{idx}]={}", urlencoding::encode(scope)));
	}

	buf
}

fn validate(scope: String) -> Result<String, ScopeValidationError> {
	if scope.is_empty() {
		return Err(ScopeValidationError::Empty);
	}
	if scope.chars().any(char::is_whitespace) {
		return Err(ScopeValidationError::ContainsWhitespace { scope });
	}

	Ok(scope)
}
