//! Claim types, the local principal, and the profile-to-claims mapping.

// std
use std::borrow::Cow;
// self
use crate::{_prelude::*, provider::ProfileData};

/// Prefix for claims derived from user preferences.
pub const PREFERENCE_CLAIM_PREFIX: &str = "AppwritePref";

/// Kind of a single claim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClaimType {
	/// Display name.
	Name,
	/// Email address.
	Email,
	/// Provider user identifier.
	Id,
	/// User preference, keyed by the preference name.
	Preference(String),
}
impl ClaimType {
	/// Stable claim type label, e.g. `name` or `AppwritePref_theme`.
	pub fn label(&self) -> Cow<'_, str> {
		match self {
			ClaimType::Name => Cow::Borrowed("name"),
			ClaimType::Email => Cow::Borrowed("email"),
			ClaimType::Id => Cow::Borrowed("id"),
			ClaimType::Preference(key) => Cow::Owned(format!("{PREFERENCE_CLAIM_PREFIX}_{key}")),
		}
	}
}
impl Display for ClaimType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.label())
	}
}
impl Serialize for ClaimType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.label())
	}
}
impl<'de> Deserialize<'de> for ClaimType {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let label = String::deserialize(deserializer)?;
		let kind = match label.as_str() {
			"name" => ClaimType::Name,
			"email" => ClaimType::Email,
			"id" => ClaimType::Id,
			other => {
				let key = other
					.strip_prefix(PREFERENCE_CLAIM_PREFIX)
					.and_then(|rest| rest.strip_prefix('_'))
					.filter(|key| !key.is_empty())
					.ok_or_else(|| {
						serde::de::Error::custom(format!("unknown claim type `{other}`"))
					})?;

				ClaimType::Preference(key.to_owned())
			},
		};

		Ok(kind)
	}
}

/// Single `(type, value)` claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
	/// Claim kind.
	#[serde(rename = "type")]
	pub kind: ClaimType,
	/// Claim value.
	pub value: String,
}
impl Claim {
	/// Creates a new claim.
	pub fn new(kind: ClaimType, value: impl Into<String>) -> Self {
		Self { kind, value: value.into() }
	}
}

/// Authenticated local user built from the provider profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	/// Claims in mapping order; the name, email, and id claims are always present.
	pub claims: Vec<Claim>,
}
impl Principal {
	/// Maps a fetched profile into claims.
	///
	/// Exactly one name, email, and id claim is emitted (empty when the profile lacks the
	/// field), followed by one claim per preference with a non-empty key.
	pub fn from_profile(profile: &ProfileData) -> Self {
		let mut claims = Vec::with_capacity(3 + profile.preferences.len());

		claims.push(Claim::new(ClaimType::Name, profile.display_name.clone().unwrap_or_default()));
		claims.push(Claim::new(ClaimType::Email, profile.email.clone().unwrap_or_default()));
		claims.push(Claim::new(ClaimType::Id, profile.id.clone()));

		for (key, value) in &profile.preferences {
			if key.is_empty() {
				continue;
			}

			claims.push(Claim::new(ClaimType::Preference(key.clone()), preference_text(value)));
		}

		Self { claims }
	}

	/// First claim value of the given type.
	pub fn find(&self, kind: &ClaimType) -> Option<&str> {
		self.claims.iter().find(|claim| &claim.kind == kind).map(|claim| claim.value.as_str())
	}

	/// Provider user identifier.
	pub fn id(&self) -> &str {
		self.find(&ClaimType::Id).unwrap_or_default()
	}

	/// Display name, empty when the provider had none.
	pub fn name(&self) -> &str {
		self.find(&ClaimType::Name).unwrap_or_default()
	}

	/// Email address, empty when the provider had none.
	pub fn email(&self) -> &str {
		self.find(&ClaimType::Email).unwrap_or_default()
	}

	/// Preference claim value by preference key.
	pub fn preference(&self, key: &str) -> Option<&str> {
		self.find(&ClaimType::Preference(key.to_owned()))
	}

	/// Iterator over `(key, value)` preference claims.
	pub fn preferences(&self) -> impl Iterator<Item = (&str, &str)> {
		self.claims.iter().filter_map(|claim| match &claim.kind {
			ClaimType::Preference(key) => Some((key.as_str(), claim.value.as_str())),
			_ => None,
		})
	}
}

fn preference_text(value: &JsonValue) -> String {
	match value {
		JsonValue::String(text) => text.clone(),
		JsonValue::Null => String::new(),
		other => other.to_string(),
	}
}
